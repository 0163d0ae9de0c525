//! Visible-participant ordering

use vgrid_protocol::{Participant, UserId};

/// Order the roster for display.
///
/// Participants with video come first, otherwise roster order is kept. When
/// there is more than one participant the current user sits at index 1.
pub fn visible_order(roster: &[Participant], current_user: UserId) -> Vec<Participant> {
    let mut ordered = roster.to_vec();
    // Vec::sort_by_key is stable
    ordered.sort_by_key(|p| !p.has_video_on);

    if ordered.len() > 1 {
        if let Some(index) = ordered.iter().position(|p| p.user_id == current_user) {
            let me = ordered.remove(index);
            ordered.insert(1, me);
        }
    }
    ordered
}
