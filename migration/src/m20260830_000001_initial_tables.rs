use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pixel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pixel::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pixel::Email).text().not_null())
                    .col(
                        ColumnDef::new(Pixel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pixels_created_at")
                    .table(Pixel::Table)
                    .col(Pixel::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Link::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Link::PixelId).string().not_null())
                    .col(ColumnDef::new(Link::DestinationUrl).text().not_null())
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_links_pixel_id")
                            .from(Link::Table, Link::PixelId)
                            .to(Pixel::Table, Pixel::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_pixel_id")
                    .table(Link::Table)
                    .col(Link::PixelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::PixelId).string().not_null())
                    .col(ColumnDef::new(Event::IpAddress).string().not_null())
                    .col(ColumnDef::new(Event::UserAgent).text().not_null())
                    .col(
                        ColumnDef::new(Event::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_pixel_id")
                            .from(Event::Table, Event::PixelId)
                            .to(Pixel::Table, Pixel::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 查询总是按 pixel 过滤再按时间过滤，使用复合索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_pixel_opened")
                    .table(Event::Table)
                    .col(Event::PixelId)
                    .col(Event::OpenedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkEvent::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LinkEvent::LinkId).string().not_null())
                    .col(ColumnDef::new(LinkEvent::IpAddress).string().not_null())
                    .col(ColumnDef::new(LinkEvent::UserAgent).text().not_null())
                    .col(
                        ColumnDef::new(LinkEvent::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_events_link_id")
                            .from(LinkEvent::Table, LinkEvent::LinkId)
                            .to(Link::Table, Link::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_link_events_link_id")
                    .table(LinkEvent::Table)
                    .col(LinkEvent::LinkId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkEvent::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pixel::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Pixel {
    #[sea_orm(iden = "pixels")]
    Table,
    Id,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Link {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    PixelId,
    DestinationUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Event {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    PixelId,
    IpAddress,
    UserAgent,
    OpenedAt,
}

#[derive(DeriveIden)]
enum LinkEvent {
    #[sea_orm(iden = "link_events")]
    Table,
    Id,
    LinkId,
    IpAddress,
    UserAgent,
    ClickedAt,
}
