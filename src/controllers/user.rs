use regex::Regex;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::core::error::{self, Error};
use crate::types::request::AuthData;
use crate::types::response::{Brand, Login};
use crate::types::user::Role;
use crate::utils::auth::{email_subject, SessionKeys};
use crate::utils::keywords;

const MIN_PASSWORD_LENGTH: usize = 6;
const BRAND_LIMIT: i64 = 50;

#[derive(Clone)]
pub(crate) struct UserController {
    pool: PgPool,
    keys: SessionKeys,
    handle_pattern: Regex,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("handle_pattern", &self.handle_pattern.as_str())
            .finish()
    }
}

struct Account {
    user_id: Uuid,
    role: String,
    email: String,
    password_hash: String,
    creator_id: Option<Uuid>,
    company_name: Option<String>,
    username: Option<String>,
}

impl UserController {
    pub(crate) fn new(pool: PgPool, keys: SessionKeys) -> Result<Self, error::ConfigError> {
        Ok(Self {
            pool,
            keys,
            handle_pattern: Regex::new(r"^[A-Za-z0-9._]{1,30}$")?,
        })
    }

    pub(crate) async fn signup(&self, data: &AuthData) -> Result<Login, Error> {
        let role: Role = data.role.parse()?;
        let email = data.email.trim().to_lowercase();

        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("Valid email is required".into()));
        }

        if data.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(Error::UserAlreadyExists);
        }

        let (creator_id, username) = match role {
            Role::Creator => {
                let handle = data.instagram_handle.trim();
                let handle = handle.strip_prefix('@').unwrap_or(handle);

                if handle.is_empty() {
                    return Err(Error::Validation("Instagram handle is required".into()));
                }

                if !self.handle_pattern.is_match(handle) {
                    return Err(Error::Validation(
                        "Instagram handle may only contain letters, numbers, periods and underscores"
                            .into(),
                    ));
                }

                let creator_id: Uuid = match sqlx::query(
                    "INSERT INTO creators (cognito_sub, username, display_name, bio, followers_count, niche, city)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (cognito_sub) DO UPDATE SET
                        username = EXCLUDED.username,
                        display_name = EXCLUDED.display_name,
                        bio = EXCLUDED.bio,
                        followers_count = EXCLUDED.followers_count,
                        niche = EXCLUDED.niche,
                        city = EXCLUDED.city,
                        updated_at = NOW()
                    RETURNING id",
                )
                .bind(email_subject(&email))
                .bind(handle)
                .bind(data.full_name.trim())
                .bind(&data.bio)
                .bind(data.followers())
                .bind(&data.niche)
                .bind(&data.city)
                .map(|row: PgRow| row.get("id"))
                .fetch_one(&mut *tx)
                .await
                {
                    Ok(id) => id,
                    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                        return Err(Error::UsernameTaken);
                    }
                    Err(e) => return Err(Error::Sql(e)),
                };

                (Some(creator_id), Some(handle.to_owned()))
            }
            Role::Brand => (None, None),
        };

        let brand_field = |value: &str| match role {
            Role::Brand => Some(value.trim().to_owned()),
            Role::Creator => None,
        };
        let company_name = brand_field(&data.company_name);

        let password_hash = self.hash(&data.password)?;

        let user_id: Uuid = match sqlx::query(
            "INSERT INTO users (email, password_hash, role, creator_id, company_name, industry, city, contact_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(creator_id)
        .bind(&company_name)
        .bind(brand_field(&data.industry))
        .bind(data.city.trim())
        .bind(brand_field(&data.contact_name))
        .map(|row: PgRow| row.get("id"))
        .fetch_one(&mut *tx)
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(Error::UserAlreadyExists);
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        tx.commit().await?;

        tracing::info!("Registered {} account {}", role, user_id);

        let session_token = self.keys.issue(
            user_id,
            creator_id,
            role,
            username.as_deref().unwrap_or_default(),
        )?;

        Ok(Login {
            user_id,
            role,
            email,
            session_token,
            creator_id,
            username,
            company_name: None,
        })
    }

    pub(crate) async fn login(&self, email: &str, password: &str) -> Result<Login, Error> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "Email and password are required".into(),
            ));
        }

        let account = self
            .get_account(&email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !bcrypt::verify(password, &account.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        let role: Role = account.role.parse().map_err(|_| Error::Internal)?;
        let username = account.username.filter(|_| account.creator_id.is_some());

        let session_token = self.keys.issue(
            account.user_id,
            account.creator_id,
            role,
            username.as_deref().unwrap_or_default(),
        )?;

        Ok(Login {
            user_id: account.user_id,
            role,
            email: account.email,
            session_token,
            creator_id: account.creator_id,
            username,
            company_name: account.company_name.filter(|name| !name.is_empty()),
        })
    }

    async fn get_account(&self, email: &str) -> Result<Option<Account>, Error> {
        match sqlx::query(
            "SELECT u.id, u.role, u.email, u.password_hash, u.creator_id, u.company_name, c.username
            FROM users u
            LEFT JOIN creators c ON u.creator_id = c.id
            WHERE u.email = $1",
        )
        .bind(email)
        .map(map_account)
        .fetch_one(&self.pool)
        .await
        {
            Ok(account) => Ok(Some(account)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn search_brands(&self, q: Option<&str>) -> Result<Vec<Brand>, Error> {
        let q = q.map(str::trim).filter(|q| !q.is_empty());

        let query = match q {
            Some(q) => sqlx::query(
                "SELECT id AS user_id, company_name, industry, city, contact_name
                FROM users
                WHERE role = 'brand'
                    AND (company_name ILIKE $1 OR industry ILIKE $1 OR city ILIKE $1 OR contact_name ILIKE $1)
                ORDER BY company_name ASC
                LIMIT $2",
            )
            .bind(keywords::like_pattern(q))
            .bind(BRAND_LIMIT),
            None => sqlx::query(
                "SELECT id AS user_id, company_name, industry, city, contact_name
                FROM users
                WHERE role = 'brand'
                ORDER BY company_name ASC
                LIMIT $1",
            )
            .bind(BRAND_LIMIT),
        };

        Ok(query.map(map_brand).fetch_all(&self.pool).await?)
    }

    fn hash(&self, value: &str) -> Result<String, Error> {
        bcrypt::hash(value, bcrypt::DEFAULT_COST).map_err(Error::Bcrypt)
    }
}

fn map_account(row: PgRow) -> Account {
    Account {
        user_id: row.get("id"),
        role: row.get("role"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        creator_id: row.get("creator_id"),
        company_name: row.get("company_name"),
        username: row.get("username"),
    }
}

fn map_brand(row: PgRow) -> Brand {
    Brand {
        user_id: row.get("user_id"),
        company_name: row.get("company_name"),
        industry: row.get("industry"),
        city: row.get("city"),
        contact_name: row.get("contact_name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(pool: PgPool) -> UserController {
        UserController::new(pool, SessionKeys::new("test-secret")).unwrap()
    }

    fn lazy_controller() -> UserController {
        controller(PgPool::connect_lazy("postgres://localhost/unused").unwrap())
    }

    fn creator_signup(email: &str, handle: &str) -> AuthData {
        AuthData {
            action: "signup".into(),
            role: "creator".into(),
            email: email.into(),
            password: "hunter22".into(),
            full_name: " Priya Sharma ".into(),
            instagram_handle: handle.into(),
            niche: "Fashion".into(),
            city: "Jaipur".into(),
            followers_count: Some(serde_json::json!("18000")),
            ..Default::default()
        }
    }

    fn brand_signup(email: &str, company: &str) -> AuthData {
        AuthData {
            action: "signup".into(),
            role: "brand".into(),
            email: email.into(),
            password: "hunter22".into(),
            company_name: company.into(),
            industry: "Beauty".into(),
            city: "Mumbai".into(),
            contact_name: "Rohan".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_signup_validation_happens_before_storage() {
        let controller = lazy_controller();

        let mut data = brand_signup("brand@example.com", "Acme");
        data.role = "admin".into();
        assert!(matches!(controller.signup(&data).await, Err(Error::Validation(_))));

        let data = brand_signup("not-an-email", "Acme");
        assert!(matches!(
            controller.signup(&data).await,
            Err(Error::Validation(message)) if message == "Valid email is required"
        ));

        let mut data = brand_signup("brand@example.com", "Acme");
        data.password = "12345".into();
        assert!(matches!(
            controller.signup(&data).await,
            Err(Error::Validation(message)) if message == "Password must be at least 6 characters"
        ));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        assert!(matches!(
            lazy_controller().login("  ", "secret").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_pattern() {
        let controller = lazy_controller();

        assert!(controller.handle_pattern.is_match("priya.styles_01"));
        assert!(!controller.handle_pattern.is_match("priya styles"));
        assert!(!controller.handle_pattern.is_match(&"a".repeat(31)));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_creator_signup_then_login(pool: PgPool) {
        let controller = controller(pool.clone());

        let signup = controller
            .signup(&creator_signup(" Priya@Example.com ", "@priya.styles"))
            .await
            .unwrap();

        assert_eq!(signup.email, "priya@example.com");
        assert_eq!(signup.role, Role::Creator);
        assert_eq!(signup.username.as_deref(), Some("priya.styles"));
        assert!(signup.creator_id.is_some());

        let followers: i32 =
            sqlx::query_scalar("SELECT followers_count FROM creators WHERE username = 'priya.styles'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(followers, 18000);

        let login = controller.login("PRIYA@example.com", "hunter22").await.unwrap();
        assert_eq!(login.user_id, signup.user_id);
        assert_eq!(login.creator_id, signup.creator_id);
        assert_eq!(login.company_name, None);

        let session = SessionKeys::new("test-secret")
            .session_from_header(Some(&format!("Bearer {}", login.session_token)))
            .unwrap();
        assert_eq!(session.creator_id, signup.creator_id);
        assert_eq!(session.username, "priya.styles");

        assert!(matches!(
            controller.login("priya@example.com", "wrong-password").await,
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            controller.login("nobody@example.com", "hunter22").await,
            Err(Error::InvalidCredentials)
        ));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicates_conflict(pool: PgPool) {
        let controller = controller(pool);

        controller
            .signup(&creator_signup("a@example.com", "taken"))
            .await
            .unwrap();

        assert!(matches!(
            controller.signup(&brand_signup("A@example.com", "Acme")).await,
            Err(Error::UserAlreadyExists)
        ));
        assert!(matches!(
            controller.signup(&creator_signup("b@example.com", "taken")).await,
            Err(Error::UsernameTaken)
        ));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_brand_signup_and_directory(pool: PgPool) {
        let controller = controller(pool);

        let signup = controller
            .signup(&brand_signup("team@zest.in", "Zest Foods"))
            .await
            .unwrap();
        controller
            .signup(&brand_signup("hello@aura.in", "Aura Skin"))
            .await
            .unwrap();

        assert_eq!(signup.creator_id, None);

        let login = controller.login("team@zest.in", "hunter22").await.unwrap();
        assert_eq!(login.role, Role::Brand);
        assert_eq!(login.company_name.as_deref(), Some("Zest Foods"));

        let all: Vec<_> = controller
            .search_brands(None)
            .await
            .unwrap()
            .into_iter()
            .map(|brand| brand.company_name)
            .collect();
        assert_eq!(
            all,
            vec![Some("Aura Skin".to_owned()), Some("Zest Foods".to_owned())]
        );

        let filtered = controller.search_brands(Some(" zest ")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user_id, signup.user_id);
    }
}
