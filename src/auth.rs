use crate::api::auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
use crate::api::users::{User, UserUpdate, UsersApi};
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::storage::{REFRESH_TOKEN_KEY, USER_ID_KEY};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    /// A token is persisted but the profile has not been fetched yet.
    Loading,
    Authenticated(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Where the session sends the user after login and logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator for headless callers: just records the move in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route.path());
    }
}

#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> ApiResult<()> {
        if self.password != self.confirm_password {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }

    /// The request as sent to the gateway; the confirmation stays local.
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            phone_number: self.phone_number,
        }
    }
}

/// The signed-in identity and its persisted tokens. Passed explicitly to
/// whatever needs it.
pub struct Session {
    client: ApiClient,
    auth: AuthApi,
    users: UsersApi,
    navigator: Arc<dyn Navigator>,
    state: SessionState,
}

impl Session {
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        let state = if client.token().is_some() {
            SessionState::Loading
        } else {
            SessionState::Unauthenticated
        };

        Self {
            auth: AuthApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            client,
            navigator,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Resolves `Loading` by fetching the stored user's profile. Any failure
    /// discards the persisted session.
    pub async fn restore(&mut self) -> &SessionState {
        if self.state != SessionState::Loading {
            return &self.state;
        }

        match self.load_user().await {
            Ok(user) => {
                debug!("Restored session for {}", user.email);
                self.state = SessionState::Authenticated(user);
            }
            Err(e) => {
                error!("Failed to load user: {}", e);
                self.discard();
            }
        }
        &self.state
    }

    pub async fn login(&mut self, credentials: LoginCredentials) -> ApiResult<User> {
        let request = LoginRequest {
            email: credentials.email,
            password: credentials.password,
        };
        let response = self.auth.login(&request).await;
        self.establish(response).await
    }

    pub async fn register(&mut self, form: RegistrationForm) -> ApiResult<User> {
        form.validate()?;
        let response = self.auth.register(&form.into_request()).await;
        self.establish(response).await
    }

    pub async fn logout(&mut self) {
        let refresh_token = self.client.store().get(REFRESH_TOKEN_KEY);
        if let Err(e) = self.auth.logout(refresh_token.as_deref()).await {
            warn!("Logout error: {}", e);
        }
        self.discard();
        self.navigator.navigate(Route::Login);
    }

    /// Saves profile changes for the signed-in user. Does nothing when no
    /// one is signed in.
    pub async fn update_user(&mut self, changes: &UserUpdate) -> ApiResult<()> {
        let SessionState::Authenticated(user) = &self.state else {
            return Ok(());
        };
        let updated = self.users.update_user(&user.id, changes).await?;
        self.state = SessionState::Authenticated(updated);
        Ok(())
    }

    /// Trades the stored refresh token for a fresh pair of tokens.
    pub async fn refresh(&mut self) -> ApiResult<()> {
        let refresh_token = self
            .client
            .store()
            .get(REFRESH_TOKEN_KEY)
            .ok_or_else(|| ApiError::Validation("No refresh token stored".to_string()))?;
        let response = self.auth.refresh_token(&refresh_token).await?;
        self.persist(&response)
    }

    /// A rejected attempt leaves the current session alone. Once the gateway
    /// has accepted the credentials, any later failure drops everything.
    async fn establish(&mut self, response: ApiResult<AuthResponse>) -> ApiResult<User> {
        let response = response?;
        let result = match self.adopt(&response) {
            Ok(()) => self.load_user().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                info!("Signed in as {}", user.email);
                self.state = SessionState::Authenticated(user.clone());
                self.navigator.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                self.discard();
                Err(e)
            }
        }
    }

    /// Persists a fresh sign-in. Entries the response leaves out are removed
    /// so nothing carries over from an earlier account.
    fn adopt(&self, response: &AuthResponse) -> ApiResult<()> {
        let store = self.client.store();
        if response.refresh_token.is_none() {
            store.remove(REFRESH_TOKEN_KEY)?;
        }
        if response.user_id.is_none() {
            store.remove(USER_ID_KEY)?;
        }
        self.persist(response)
    }

    fn persist(&self, response: &AuthResponse) -> ApiResult<()> {
        let store = self.client.store();
        self.client.set_token(Some(&response.token))?;
        if let Some(refresh_token) = &response.refresh_token {
            store.set(REFRESH_TOKEN_KEY, refresh_token)?;
        }
        if let Some(user_id) = &response.user_id {
            store.set(USER_ID_KEY, user_id)?;
        }
        Ok(())
    }

    async fn load_user(&self) -> ApiResult<User> {
        let user_id = self
            .client
            .store()
            .get(USER_ID_KEY)
            .ok_or_else(|| ApiError::Validation("No user id stored".to_string()))?;
        self.users.user_profile(&user_id).await
    }

    fn discard(&mut self) {
        if let Err(e) = self.client.store().clear_session() {
            warn!("Failed to clear session storage: {}", e);
        }
        self.state = SessionState::Unauthenticated;
    }
}
