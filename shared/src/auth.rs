//! Login, signup, OTP verification and logout.
//!
//! These are the only flows that write the session. Login and signup store
//! the account identity and hand back the OTP; verify exchanges the OTP for
//! a token; logout clears everything once the server agrees.

use tracing::{info, warn};

use crate::session::{KeyValueStore, Session, SessionService};
use crate::{
    BookApi, ClientError, LoginRequest, LogoutRequest, OtpResponse, Recommendation, SignupRequest,
    ValidationError, VerifyRequest,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub phonenumber: String,
}

impl LoginForm {
    /// Phone takes precedence when both are filled in.
    pub fn request(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        let phone = self.phonenumber.trim();
        match (email.is_empty(), phone.is_empty()) {
            (_, false) => Ok(LoginRequest {
                email: None,
                phonenumber: Some(phone.to_string()),
            }),
            (false, true) => Ok(LoginRequest {
                email: Some(email.to_string()),
                phonenumber: None,
            }),
            (true, true) => Err(ValidationError::MissingContact),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub phonenumber: String,
}

impl SignupForm {
    pub fn request(&self) -> Result<SignupRequest, ValidationError> {
        let field = |value: &str, name: &'static str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ValidationError::MissingField(name))
            } else {
                Ok(value.to_string())
            }
        };
        Ok(SignupRequest {
            username: field(&self.username, "username")?,
            email: field(&self.email, "email")?,
            phonenumber: field(&self.phonenumber, "phone number")?,
        })
    }
}

/// A code waiting to be entered on the verify screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub otp: String,
    pub username: String,
    pub phonenumber: String,
}

/// Replace the whole session with the account the server just answered
/// for. A token from an earlier login never survives into the new identity.
fn store_identity<S: KeyValueStore>(
    session: &mut SessionService<S>,
    resp: OtpResponse,
) -> Result<OtpChallenge, ClientError> {
    session.set(&Session {
        token: resp.token.filter(|t| !t.is_empty()),
        username: Some(resp.username.clone()),
        email: resp.email,
        phonenumber: Some(resp.phonenumber.clone()),
    })?;
    Ok(OtpChallenge {
        otp: resp.otp,
        username: resp.username,
        phonenumber: resp.phonenumber,
    })
}

pub async fn login<A, S>(
    api: &A,
    session: &mut SessionService<S>,
    form: &LoginForm,
) -> Result<OtpChallenge, ClientError>
where
    A: BookApi + ?Sized,
    S: KeyValueStore,
{
    let req = form.request()?;
    let resp = api.login(&req).await.inspect_err(|e| warn!(error = %e, "login failed"))?;
    info!(username = %resp.username, "login accepted; awaiting code");
    store_identity(session, resp)
}

pub async fn signup<A, S>(
    api: &A,
    session: &mut SessionService<S>,
    form: &SignupForm,
) -> Result<OtpChallenge, ClientError>
where
    A: BookApi + ?Sized,
    S: KeyValueStore,
{
    let req = form.request()?;
    let resp = api.signup(&req).await.inspect_err(|e| warn!(error = %e, "signup failed"))?;
    info!(username = %resp.username, "signup accepted; awaiting code");
    store_identity(session, resp)
}

/// Exchange the OTP for a token, using the phone number stored by login or
/// signup.
pub async fn verify<A, S>(
    api: &A,
    session: &mut SessionService<S>,
    code: &str,
) -> Result<Session, ClientError>
where
    A: BookApi + ?Sized,
    S: KeyValueStore,
{
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::MissingCode.into());
    }
    let phonenumber = session
        .get()?
        .phonenumber
        .ok_or(ValidationError::NoPendingVerification)?;

    let resp = api
        .verify(&VerifyRequest {
            phonenumber,
            code: code.to_string(),
        })
        .await
        .inspect_err(|e| warn!(error = %e, "verification failed"))?;

    let stored = session.update(|s| s.token = Some(resp.token))?;
    info!("verified; session stored");
    Ok(stored)
}

/// Tell the server, then forget the session. A failed request keeps the
/// session so the user can try again.
pub async fn logout<A, S>(api: &A, session: &mut SessionService<S>) -> Result<(), ClientError>
where
    A: BookApi + ?Sized,
    S: KeyValueStore,
{
    let token = session.require_token()?;
    api.logout(&LogoutRequest { token })
        .await
        .inspect_err(|e| warn!(error = %e, "logout failed"))?;
    session.clear()?;
    Ok(())
}

/// The profile screen's list of the user's own posts.
pub async fn user_books<A: BookApi + ?Sized>(
    api: &A,
    token: &str,
) -> Result<Vec<Recommendation>, ClientError> {
    api.user_books(token).await
}
