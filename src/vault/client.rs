//! Client implementation for Vault API interactions.
//!
//! This module provides a client for making HTTP requests to the Vault API
//! with appropriate authentication and error handling.

use crate::vault::common::check_response;
use crate::vault::{VaultConfig, VaultError};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Certificate, Client, Method,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Client for interacting with the Vault HTTP API.
pub struct VaultClient {
    /// Base URL of the Vault server
    pub addr: String,
    /// Auth token for Vault API requests, set by `authenticate`
    token: Option<String>,
    /// HTTP client for making requests
    client: Client,
    /// Headers added to every request
    default_headers: HeaderMap,
}

impl VaultClient {
    /// Creates a new VaultClient with the specified address and no token.
    pub fn new(addr: &str) -> Result<Self, VaultError> {
        Self::from_config(&VaultConfig::new(addr))
    }

    /// Creates a client from a [`VaultConfig`], trusting its CA certificate if one is set.
    pub fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(30));

        if let Some(ca_path) = &config.ca_cert_path {
            let pem = std::fs::read(ca_path).map_err(|source| VaultError::File {
                path: ca_path.clone(),
                source,
            })?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        }

        let client = builder
            .build()
            .map_err(|e| VaultError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let mut default_headers = HeaderMap::new();
        if let Some(namespace) = &config.namespace {
            let value = HeaderValue::from_str(namespace)
                .map_err(|e| VaultError::Connection(format!("Invalid namespace: {}", e)))?;
            default_headers.insert("X-Vault-Namespace", value);
        }

        Ok(Self {
            addr: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
            default_headers,
        })
    }

    /// Replaces the token used for subsequent requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Returns true if a token has been set on this client.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Makes a GET request to the Vault API.
    pub async fn get(&self, path: &str) -> Result<Value, VaultError> {
        self.request(Method::GET, path, None).await
    }

    /// Makes a POST request to the Vault API without a body.
    pub async fn post(&self, path: &str) -> Result<Value, VaultError> {
        self.request(Method::POST, path, None).await
    }

    /// Makes a POST request to the Vault API with a JSON body.
    pub async fn post_with_body(&self, path: &str, body: Value) -> Result<Value, VaultError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Makes a PUT request to the Vault API with a JSON body.
    pub async fn put_with_body(&self, path: &str, body: Value) -> Result<Value, VaultError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Makes a request to the Vault API with the specified method and optional body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, VaultError> {
        let token = self.token.as_deref().ok_or(VaultError::NotAuthenticated)?;
        let url = format!("{}{}", self.addr, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.default_headers.clone())
            .header("X-Vault-Token", token);

        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VaultError::Network(format!("Request failed: {}", e)))?;

        check_response(response).await
    }
}
