//! Client-visible session state.

use crate::SessionError;
use alloy_primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use missive_common::EtherAmount;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// State mirrored from the wallet and the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The account authorized by the last successful connect.
    pub current_account: Option<Address>,
    /// Whether a recorded transfer is waiting for confirmation.
    pub is_loading: bool,
    /// The last known number of recorded transfers.
    pub transaction_count: Option<u64>,
    /// The transfers from the last successful list fetch.
    pub transactions: Vec<TransferRecord>,
}

/// A transfer read back from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub address_from: Address,
    pub address_to: Address,
    pub timestamp: DateTime<Utc>,
    pub amount: EtherAmount,
    pub message: String,
    pub keyword: String,
}

impl TryFrom<RawTransferRecord> for TransferRecord {
    type Error = SessionError;

    fn try_from(raw: RawTransferRecord) -> Result<Self, Self::Error> {
        let timestamp = i64::try_from(raw.timestamp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or(SessionError::MalformedRecord { timestamp: raw.timestamp })?;
        Ok(Self {
            address_from: raw.sender,
            address_to: raw.receiver,
            timestamp,
            amount: EtherAmount::from_wei(raw.amount),
            message: raw.message,
            keyword: raw.keyword,
        })
    }
}

/// A transfer as the ledger stores it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTransferRecord {
    pub sender: Address,
    pub receiver: Address,
    /// Unix seconds.
    pub timestamp: u64,
    /// Base units.
    pub amount: U256,
    pub message: String,
    pub keyword: String,
}

/// User input for the next transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub address_to: String,
    /// Decimal ether amount.
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

impl TransferForm {
    /// Replaces one field, keeping the others.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::AddressTo => &mut self.address_to,
            FormField::Amount => &mut self.amount,
            FormField::Keyword => &mut self.keyword,
            FormField::Message => &mut self.message,
        };
        *slot = value.into();
    }
}

/// A [`TransferForm`] field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 4] = [Self::AddressTo, Self::Amount, Self::Keyword, Self::Message];

    /// The field's name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddressTo => "addressTo",
            Self::Amount => "amount",
            Self::Keyword => "keyword",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addressTo" | "address_to" | "to" => Ok(Self::AddressTo),
            "amount" => Ok(Self::Amount),
            "keyword" => Ok(Self::Keyword),
            "message" => Ok(Self::Message),
            _ => Err(format!("unknown form field: {s}")),
        }
    }
}

/// Result of a confirmed [`send_transfer`](crate::SessionController::send_transfer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    /// Hash of the value transfer sent through the wallet.
    pub value_tx: TxHash,
    /// Hash of the confirmed ledger write.
    pub record_tx: TxHash,
    /// The ledger's transfer count after the write.
    pub transaction_count: u64,
}
