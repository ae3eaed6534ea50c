use super::AuthError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// A stored hash that bcrypt cannot parse is treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!("Unreadable password hash: {}", e);
            false
        }
    }
}

/// Hash on the blocking pool so bcrypt never stalls an async worker
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // lowest cost bcrypt accepts, keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn verifies_correct_password() {
        let hash = hash_password("correct horse", TEST_COST).unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "plain-text-not-a-hash"));
    }

    #[tokio::test]
    async fn blocking_pool_variants_agree() {
        let hash = hash_password_blocking("open sesame".to_string(), TEST_COST).await.unwrap();
        assert!(verify_password_blocking("open sesame".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("close sesame".to_string(), hash).await.unwrap());
        assert!(hash_password_blocking("pw".to_string(), 1).await.is_err());
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(matches!(hash_password("pw", 1), Err(AuthError::Hashing(_))));
    }
}
