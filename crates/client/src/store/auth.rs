use api_types::user::UserView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserView>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum AuthAction {
    UserLoaded(UserView),
    LoginSuccess(UserView),
    RegisterSuccess(UserView),
    /// Credentials rejected while loading the current user.
    AuthError(Option<String>),
    LoginFail(String),
    RegisterFail(String),
    Logout,
    ClearError,
}

impl AuthState {
    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::UserLoaded(user)
            | AuthAction::LoginSuccess(user)
            | AuthAction::RegisterSuccess(user) => Self {
                user: Some(user),
                is_authenticated: true,
                loading: false,
                ..self
            },
            AuthAction::AuthError(error) => Self::signed_out(error),
            AuthAction::LoginFail(error) | AuthAction::RegisterFail(error) => {
                Self::signed_out(Some(error))
            }
            AuthAction::Logout => Self::signed_out(None),
            AuthAction::ClearError => Self {
                error: None,
                ..self
            },
        }
    }

    fn signed_out(error: Option<String>) -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: false,
            error,
        }
    }
}
