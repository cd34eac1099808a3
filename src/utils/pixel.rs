//! The tracking beacon asset.
//!
//! A 1×1 fully transparent PNG, served byte-identical on every beacon
//! request. Responses carry `Cache-Control: no-cache, no-store,
//! must-revalidate` so intermediaries never absorb repeat fetches.

/// Smallest valid 1×1 transparent PNG (RGBA, 68 bytes).
pub const TRANSPARENT_PNG: [u8; 68] = [
    // PNG signature
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
    // IHDR: 1x1, bit depth 8, color type 6 (RGBA)
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89,
    // IDAT: one zlib-deflated scanline, all channels zero
    0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x60,
    0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0xE9, 0xFA, 0xDC, 0xD8,
    // IEND
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];
