use rand::Rng;

use crate::{db::DbPool, error::AppResult};

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_LEN: usize = 6;

/// Allocate a user id no existing `usuarios` row holds.
///
/// Samples six characters uniformly from `0-9A-Z` and resamples for as long
/// as the candidate is taken, without an attempt cap. The check and the
/// later insert are separate statements, so under concurrent registrations
/// the UNIQUE constraint on `usuarios.id_usuario` stays the final arbiter;
/// a collision then surfaces as a store error on insert, not here.
pub async fn generate_user_id(pool: &DbPool) -> AppResult<String> {
    loop {
        let candidate = random_candidate();
        let taken: Option<(String,)> =
            sqlx::query_as("SELECT id_usuario FROM usuarios WHERE id_usuario = $1")
                .bind(&candidate)
                .fetch_optional(pool)
                .await?;
        if taken.is_none() {
            return Ok(candidate);
        }
    }
}

fn random_candidate() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_are_six_chars() {
        for _ in 0..100 {
            assert_eq!(random_candidate().len(), 6);
        }
    }

    #[test]
    fn test_candidates_stay_in_alphabet() {
        for _ in 0..100 {
            let candidate = random_candidate();
            assert!(
                candidate
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
                "unexpected character in {candidate}"
            );
        }
    }

    #[test]
    fn test_candidates_vary() {
        let first = random_candidate();
        let seen_other = (0..100).any(|_| random_candidate() != first);
        assert!(seen_other, "100 draws produced the same id");
    }
}
