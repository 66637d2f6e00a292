//! Random paste identifier generation.
//!
//! Identifiers are drawn by rejection sampling against a live existence
//! check. With 66 symbols over 8 positions the space holds roughly 3.6e14
//! identifiers, so a run of collisions long enough to matter needs a store
//! many orders of magnitude larger than this service is meant to hold. The
//! retry loop is therefore unbounded: collisions cost a retry, never a wrong
//! result.

use crate::constants::{PASTE_ID_ALPHABET, PASTE_ID_LENGTH};
use crate::models::PasteId;
use rand::Rng;

const _: () = {
    assert!(PASTE_ID_LENGTH > 0);
    assert!(PASTE_ID_ALPHABET.len() == 66);
};

/// Generate a random identifier without checking the store.
///
/// # Returns
/// An identifier matching the fixed format.
pub fn generate_id() -> PasteId {
    generate_id_with(&mut rand::thread_rng())
}

/// Generate a random identifier from the provided RNG.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R) -> PasteId {
    let id: String = (0..PASTE_ID_LENGTH)
        .map(|_| PASTE_ID_ALPHABET[rng.gen_range(0..PASTE_ID_ALPHABET.len())] as char)
        .collect();
    PasteId::from_stored(id)
}

/// Generate an identifier that `exists_check` reports as unused.
///
/// # Arguments
/// - `exists_check`: Returns `Ok(true)` when the candidate is already taken.
///
/// # Returns
/// The first candidate reported as free.
///
/// # Errors
/// Propagates the first error returned by `exists_check`.
pub fn generate_unique_id<F, E>(mut exists_check: F) -> Result<PasteId, E>
where
    F: FnMut(&PasteId) -> Result<bool, E>,
{
    let mut rng = rand::thread_rng();
    let mut attempts: u32 = 0;
    loop {
        let candidate = generate_id_with(&mut rng);
        attempts += 1;
        if !exists_check(&candidate)? {
            if attempts > 1 {
                tracing::debug!(attempts, "identifier collision resolved by resampling");
            }
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_match_format() {
        for _ in 0..1_000 {
            let id = generate_id();
            assert!(
                crate::models::paste::is_valid_id(id.as_str()),
                "invalid id {}",
                id
            );
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate_id_with(&mut StdRng::seed_from_u64(7));
        let b = generate_id_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn unique_id_resamples_until_free() {
        let mut taken = HashSet::new();
        let mut calls = 0;
        let id = generate_unique_id::<_, ()>(|candidate| {
            calls += 1;
            if calls <= 3 {
                taken.insert(candidate.clone());
                return Ok(true);
            }
            Ok(false)
        })
        .expect("generation");
        assert_eq!(calls, 4);
        assert!(!taken.contains(&id));
    }

    #[test]
    fn unique_id_propagates_check_errors() {
        let err = generate_unique_id(|_| Err::<bool, _>("store down")).expect_err("error");
        assert_eq!(err, "store down");
    }
}
