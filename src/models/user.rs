//! Requester identity and user profile data

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Profile fields used to back-fill reservation contact details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

/// JWT claims issued by the authentication service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    /// Set when the caller acts as manager of this club
    #[serde(default)]
    pub club_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Whether the caller manages the given club
    pub fn manages_club(&self, club_id: i32) -> bool {
        self.club_id == Some(club_id)
    }

    pub fn require_club(&self, club_id: i32) -> Result<(), AppError> {
        if self.manages_club(club_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Not allowed to act on behalf of club {}",
                club_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(club_id: Option<i32>) -> UserClaims {
        let now = chrono::Utc::now().timestamp();
        UserClaims {
            sub: "ana".to_string(),
            user_id: 7,
            club_id,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Some(3)).create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.club_id, Some(3));
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_require_club() {
        assert!(claims(Some(3)).require_club(3).is_ok());
        assert!(matches!(
            claims(Some(3)).require_club(4),
            Err(AppError::Authorization(_))
        ));
        assert!(claims(None).require_club(3).is_err());
    }
}
