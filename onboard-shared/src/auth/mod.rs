/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token issuing and verification
/// - [`middleware`]: Bearer token extraction into an [`middleware::AuthContext`]
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use onboard_shared::auth::jwt::{issue_token, verify_token};
/// use onboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = issue_token("user-id", "user@example.com", "secret-key", Duration::days(7))?;
/// assert_eq!(verify_token(&token, "secret-key")?.sub, "user-id");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
