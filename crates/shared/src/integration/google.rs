use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use crate::{
    abstract_trait::OAuthProviderTrait,
    config::GoogleOAuthConfig,
    domain::request::GoogleProfile,
    utils::AppError,
};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    client: Client,
}

impl GoogleOAuth {
    pub fn new(config: &GoogleOAuthConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: String,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

impl UserInfo {
    fn into_profile(self) -> GoogleProfile {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string());

        GoogleProfile {
            google_id: self.sub,
            email: self.email.to_lowercase(),
            name,
            picture: self.picture,
        }
    }
}

#[async_trait]
impl OAuthProviderTrait for GoogleOAuth {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Invalid authorize URL: {e}")))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, AppError> {
        info!("Exchanging Google authorization code");

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Google token exchange failed {status}: {text}");
            return Err(AppError::Unauthorized(
                "Google authorization failed".to_string(),
            ));
        }

        let token: TokenResponse = response.json().await?;

        let user_info: UserInfo = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !user_info.email_verified {
            return Err(AppError::Unauthorized(
                "Google account email is not verified".to_string(),
            ));
        }

        Ok(user_info.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> GoogleOAuth {
        GoogleOAuth::new(&GoogleOAuthConfig {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:8000/api/auth/google/callback".into(),
        })
        .unwrap()
    }

    #[test]
    fn authorize_url_carries_state_and_redirect() {
        let url = Url::parse(&oauth().authorize_url("abc123").unwrap()).unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(params.contains(&("state".into(), "abc123".into())));
        assert!(params.contains(&("client_id".into(), "client-123".into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "http://localhost:8000/api/auth/google/callback".into()
        )));
    }

    #[test]
    fn profile_name_falls_back_to_email_local_part() {
        let info = UserInfo {
            sub: "1".into(),
            email: "Sari@Example.com".into(),
            email_verified: true,
            name: None,
            picture: None,
        };

        let profile = info.into_profile();
        assert_eq!(profile.name, "Sari");
        assert_eq!(profile.email, "sari@example.com");
    }
}
