use rand::Rng;

/// Uniform winner selection over the roster. Pure and seedable so the
/// distribution is testable; `None` only for an empty roster.
pub fn pick_winner<R: Rng + ?Sized>(participants: &[String], rng: &mut R) -> Option<usize> {
    if participants.is_empty() {
        return None;
    }

    Some(rng.random_range(0..participants.len()))
}
