use super::{Album, Preliminary};

/// Fills gaps in an album with metadata read off its listing tile
///
/// Each of `date`, `photo_count` and `view_count` is copied only when the
/// album's own value is empty/zero and the tile's value is not. Values read
/// from the album page itself always win, so merging is idempotent.
pub fn merge(mut album: Album, preliminary: &Preliminary) -> Album {
    let tile_date = preliminary.date.trim();
    if album.date.trim().is_empty() && !tile_date.is_empty() {
        album.date = tile_date.to_string();
    }

    if album.photo_count == 0 && preliminary.photo_count > 0 {
        album.photo_count = preliminary.photo_count;
    }

    if album.view_count == 0 && preliminary.view_count > 0 {
        album.view_count = preliminary.view_count;
    }

    album
}
