use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use anyhow::{Error, Result};
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    abi::{self, Token},
    reader::{Identity, IdentityProvider, LedgerReader},
    record::ProjectRecord,
};

/// Reads the funding contract through a node's HTTP JSON-RPC endpoint.
pub struct JsonRpcLedger {
    client: reqwest::Client,
    url: String,
    contract_address: String,
    account: Option<String>,
    request_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(
        url: &str,
        contract_address: &str,
        request_timeout: &Duration,
        account: Option<&str>,
    ) -> Result<Self> {
        let contract_address = abi::format_address(&abi::parse_address(contract_address)?);
        let account = match account {
            Some(account) => Some(abi::format_address(&abi::parse_address(account)?)),
            None => None,
        };

        cf_log::info(
            Some("⚡"),
            format!("[JsonRpcLedger] Reading contract {contract_address} through {url}"),
        );

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(*request_timeout)
                .build()?,
            url: url.to_owned(),
            contract_address,
            account,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse<T>>()
            .await?;

        match (response.result, response.error) {
            (_, Some(err)) => Err(Error::msg(format!(
                "{method} failed with code {}: {}",
                err.code, err.message
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::msg(format!("{method} returned neither result nor error"))),
        }
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let result: String = self
            .request(
                "eth_call",
                json!([
                    {
                        "to": self.contract_address,
                        "data": format!("0x{}", hex::encode(data)),
                    },
                    "latest",
                ]),
            )
            .await?;
        abi::decode_hex(&result)
    }
}

#[async_trait]
impl LedgerReader for JsonRpcLedger {
    async fn record_count(&self) -> Result<u64> {
        let data = self.call(abi::encode_call(abi::PROJECT_COUNT, &[])?).await?;
        let count = abi::decode_uint(&data)?;
        u64::try_from(&count).map_err(|_| Error::msg(format!("Project count {count} exceeds u64")))
    }

    async fn record_at(&self, index: u64) -> Result<ProjectRecord> {
        let data = self
            .call(abi::encode_call(
                abi::PROJECTS,
                &[Token::Uint(BigUint::from(index))],
            )?)
            .await?;
        abi::decode_project(&data)
    }

    async fn donation(&self, index: u64, donor: &str) -> Result<BigUint> {
        let data = self
            .call(abi::encode_call(
                abi::DONATIONS,
                &[Token::Uint(BigUint::from(index)), Token::Address(donor)],
            )?)
            .await?;
        abi::decode_uint(&data)
    }
}

#[async_trait]
impl IdentityProvider for JsonRpcLedger {
    async fn identity(&self) -> Result<Identity> {
        let chain_id: String = self.request("eth_chainId", json!([])).await?;
        let chain_id = u64::from_str_radix(chain_id.trim_start_matches("0x"), 16)?;

        let account = match &self.account {
            Some(account) => Some(account.clone()),
            None => {
                let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
                accounts.into_iter().next()
            }
        };

        Ok(Identity::new(account.as_deref(), &chain_id))
    }
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}
