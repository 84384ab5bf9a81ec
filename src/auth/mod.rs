//! Auth service client
//!
//! Login, signup, profile and avatar calls. Tokens and passwords are held as
//! [`SecretString`] and only exposed when written into a request.

use crate::config::{PortalConfig, join_url};
use crate::defaults::endpoints::{AVATAR, LOGIN, ME, SIGNUP};
use crate::error::PortalError;
use crate::execution::http::interceptor::apply_before_send;
use crate::execution::http::response::{classify, error_from_detail};
use crate::execution::http::{HttpInterceptor, HttpRequestContext, build_http_client_from_config};
use crate::types::{AuthResponse, ProfileUpdate, SignupRequest, UserData};
use bytes::Bytes;
use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// How the message of a failed response is produced.
#[derive(Debug, Clone, Copy)]
enum OnFailure {
    /// `detail[0].msg` from the JSON body, else the given text
    Detail(&'static str),
    /// Always the given text
    Fixed(&'static str),
}

#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http_client: reqwest::Client,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl AuthClient {
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        Ok(Self {
            base_url: config.auth_base_url.clone(),
            http_client: build_http_client_from_config(&config.http)?,
            interceptors: config.interceptors.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for tokens (OAuth2 password grant, form encoded).
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, PortalError> {
        let url = join_url(&self.base_url, LOGIN);
        tracing::debug!(target: "rohde_portal::auth", username = %username, "logging in");

        let params = [
            ("username", username),
            ("password", password.expose_secret()),
            ("grant_type", "password"),
        ];
        let builder = self.http_client.post(&url).form(&params);
        let response = self
            .execute(&url, builder, OnFailure::Detail("Login failed"))
            .await?;
        Ok(response.json().await?)
    }

    /// Register a new account with the `user` role.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, PortalError> {
        let url = join_url(&self.base_url, SIGNUP);
        tracing::debug!(target: "rohde_portal::auth", email = %request.email, "signing up");

        let mut form = Form::new()
            .text("name", request.name)
            .text("email", request.email)
            .text("password", request.password.expose_secret().to_string())
            .text("role", "user");
        if let Some(avatar) = &request.avatar {
            form = form.part("avatar", avatar.to_part()?);
        }

        let builder = self.http_client.post(&url).multipart(form);
        let response = self
            .execute(&url, builder, OnFailure::Detail("Signup failed"))
            .await?;
        Ok(response.json().await?)
    }

    /// Profile of the user owning `access_token`.
    pub async fn get_me(&self, access_token: &SecretString) -> Result<UserData, PortalError> {
        let url = join_url(&self.base_url, ME);
        let builder = self
            .http_client
            .get(&url)
            .bearer_auth(access_token.expose_secret());
        let response = self
            .execute(&url, builder, OnFailure::Fixed("Failed to fetch user data"))
            .await?;
        Ok(response.json().await?)
    }

    /// Update the profile; only non-empty fields of `update` are sent.
    pub async fn update_me(
        &self,
        access_token: &SecretString,
        update: ProfileUpdate,
    ) -> Result<UserData, PortalError> {
        let url = join_url(&self.base_url, ME);

        let mut form = Form::new();
        if let Some(name) = update.name.filter(|v| !v.is_empty()) {
            form = form.text("name", name);
        }
        if let Some(email) = update.email.filter(|v| !v.is_empty()) {
            form = form.text("email", email);
        }
        if let Some(password) = update
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty())
        {
            form = form.text("password", password.to_string());
        }
        if let Some(avatar) = &update.avatar {
            form = form.part("avatar", avatar.to_part()?);
        }

        let builder = self
            .http_client
            .put(&url)
            .bearer_auth(access_token.expose_secret())
            .multipart(form);
        let response = self
            .execute(&url, builder, OnFailure::Detail("Update failed"))
            .await?;
        Ok(response.json().await?)
    }

    /// Raw avatar image stored under `file_id`.
    pub async fn get_avatar(&self, file_id: &str) -> Result<Bytes, PortalError> {
        let url = format!(
            "{}/{}",
            join_url(&self.base_url, AVATAR),
            urlencoding::encode(file_id)
        );
        let builder = self.http_client.get(&url);
        let response = self
            .execute(&url, builder, OnFailure::Fixed("Failed to fetch avatar"))
            .await?;
        Ok(response.bytes().await?)
    }

    /// Avatar image for a stored avatar path such as `avatars/ab12.png`.
    ///
    /// The last path segment is the file id. Returns `None` for an empty
    /// path or segment, and for any failure (which is logged).
    pub async fn get_avatar_image(&self, avatar_path: &str) -> Option<Bytes> {
        let file_id = avatar_path.rsplit('/').next().filter(|s| !s.is_empty())?;
        match self.get_avatar(file_id).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::error!(target: "rohde_portal::auth", file_id = %file_id, error = %e, "Error loading avatar image");
                None
            }
        }
    }

    async fn execute(
        &self,
        url: &str,
        builder: reqwest::RequestBuilder,
        on_failure: OnFailure,
    ) -> Result<reqwest::Response, PortalError> {
        let ctx = HttpRequestContext::new("auth", url, false);
        let result = self.send(&ctx, builder, on_failure).await;
        if let Err(e) = &result {
            tracing::debug!(target: "rohde_portal::auth", request_id = %ctx.request_id, url = %url, error = %e, "auth request failed");
            for it in &self.interceptors {
                it.on_error(&ctx, e);
            }
        }
        result
    }

    async fn send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        on_failure: OnFailure,
    ) -> Result<reqwest::Response, PortalError> {
        let builder = apply_before_send(&self.interceptors, ctx, builder)?;
        let response = builder.send().await?;
        for it in &self.interceptors {
            it.on_response(ctx, &response);
        }
        if response.status().is_success() {
            return Ok(response);
        }

        Err(match on_failure {
            OnFailure::Detail(fallback) => error_from_detail(response, fallback).await,
            OnFailure::Fixed(message) => classify(response.status().as_u16(), message.to_string()),
        })
    }
}
