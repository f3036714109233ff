// tasktracker-service/src/services/auth_service.rs
use crate::config::AuthMode;
use crate::models::{
    AuthResponse, DevLoginRequest, LoginRequest, PublicUser, RegisterRequest, ServiceError, TokenKind, TokenPair,
    User,
};
use crate::services::invitation_service::InvitationService;
use crate::utils::jwt::JwtKeys;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::normalize_email;
use crate::utils::Store;
use log::{info, warn};

const MIN_PASSWORD_LENGTH: usize = 6;

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthorized("Invalid email or password".to_string())
}

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    keys: JwtKeys,
    mode: AuthMode,
    bcrypt_cost: u32,
    invitations: InvitationService,
}

impl AuthService {
    pub fn new(store: Store, keys: JwtKeys, mode: AuthMode, bcrypt_cost: u32, invitations: InvitationService) -> Self {
        Self {
            store,
            keys,
            mode,
            bcrypt_cost,
            invitations,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    // An invite token is checked before the account exists and accepted right after;
    // only the check can fail the registration
    pub fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        let email = normalize_email(&request.email)?;
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let invite_token = request.invite_token.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if let Some(token) = invite_token {
            self.invitations.pending_for_email(token, &email)?;
        }

        if self.store.find_user_by_email(&email)?.is_some() {
            warn!("❌ Registration for existing email: {}", email);
            return Err(ServiceError::Conflict("Email is already registered".to_string()));
        }

        let name = request.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = self.store.insert_user(User::new(email, name, Some(password_hash)))?;
        info!("✅ Registered user: {}", user.email);

        if let Some(token) = invite_token {
            self.join_invited_workspace(&user, token);
        }

        self.respond(&user)
    }

    // The account already exists at this point, so a failed accept (the
    // invitation was cancelled or used in the meantime) still signs the user in
    // without the membership. Returns whether the user joined.
    fn join_invited_workspace(&self, user: &User, token: &str) -> bool {
        match self.invitations.accept(&user.id, token) {
            Ok(accepted) => {
                info!("✅ {} joined workspace {} on registration", user.email, accepted.workspace_id);
                true
            }
            Err(e) => {
                warn!("⚠️ Registered {} but could not accept their invitation: {}", user.email, e);
                false
            }
        }
    }

    pub fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let user = self.authenticate(&request.email, &request.password)?;
        info!("🔓 User logged in: {}", user.email);
        self.respond(&user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = email.trim().to_lowercase();
        let user = self.store.find_user_by_email(&email)?.ok_or_else(invalid_credentials)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;

        if !verify_password(password, hash)? {
            warn!("❌ Bad password for: {}", email);
            return Err(invalid_credentials());
        }
        Ok(user)
    }

    // Insecure auto-provisioning: finds or creates the user without any password check
    pub fn dev_login(&self, request: DevLoginRequest) -> Result<AuthResponse, ServiceError> {
        if self.mode != AuthMode::Dev {
            return Err(ServiceError::Forbidden("Dev login is disabled".to_string()));
        }

        let email = normalize_email(&request.email)?;
        let user = match self.store.find_user_by_email(&email)? {
            Some(user) => user,
            None => {
                let name = request.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
                match self.store.insert_user(User::new(email.clone(), name, None)) {
                    Ok(user) => {
                        warn!("⚠️ Dev login provisioned user: {}", user.email);
                        user
                    }
                    // Lost a race with a concurrent dev login for the same email
                    Err(ServiceError::Conflict(_)) => self
                        .store
                        .find_user_by_email(&email)?
                        .ok_or(ServiceError::InternalServerError)?,
                    Err(e) => return Err(e),
                }
            }
        };

        self.respond(&user)
    }

    pub fn issue_tokens(&self, user_id: &str, email: &str) -> Result<TokenPair, ServiceError> {
        self.keys.generate_pair(user_id, email)
    }

    // No revocation list: the old refresh token stays valid until it expires
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let claims = self.keys.decode_token(refresh_token, TokenKind::Refresh)?;
        let user = self
            .store
            .find_user_by_id(&claims.sub)?
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))?;
        self.issue_tokens(&user.id, &user.email)
    }

    pub fn me(&self, user_id: &str) -> Result<PublicUser, ServiceError> {
        self.store
            .find_user_by_id(user_id)?
            .map(|user| user.public())
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, ServiceError> {
        Ok(AuthResponse {
            user: user.public(),
            tokens: self.issue_tokens(&user.id, &user.email)?,
        })
    }
}
