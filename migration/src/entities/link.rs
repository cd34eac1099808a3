use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub pixel_id: String,
    #[sea_orm(column_type = "Text")]
    pub destination_url: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pixel::Entity",
        from = "Column::PixelId",
        to = "super::pixel::Column::Id"
    )]
    Pixel,
    #[sea_orm(has_many = "super::link_event::Entity")]
    LinkEvent,
}

impl Related<super::pixel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pixel.def()
    }
}

impl Related<super::link_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
