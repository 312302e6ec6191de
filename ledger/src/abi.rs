//! Just enough of the contract ABI to call the funding contract's view
//! functions and read their return data.

use anyhow::{Error, Result};
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

use crate::record::ProjectRecord;

pub const WORD: usize = 32;

pub const PROJECT_COUNT: &str = "projectCount()";
pub const PROJECTS: &str = "projects(uint256)";
pub const DONATIONS: &str = "donations(uint256,address)";

pub enum Token<'a> {
    Uint(BigUint),
    Address(&'a str),
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_call(signature: &str, args: &[Token]) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        match arg {
            Token::Uint(value) => {
                let bytes = value.to_bytes_be();
                if bytes.len() > WORD {
                    return Err(Error::msg(format!("Value {value} does not fit in uint256")));
                }
                data.extend(std::iter::repeat(0u8).take(WORD - bytes.len()));
                data.extend_from_slice(&bytes);
            }
            Token::Address(address) => {
                data.extend_from_slice(&[0u8; WORD - 20]);
                data.extend_from_slice(&parse_address(address)?);
            }
        }
    }
    Ok(data)
}

pub fn parse_address(address: &str) -> Result<[u8; 20]> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits)?;
    <[u8; 20]>::try_from(bytes.as_slice())
        .map_err(|_| Error::msg(format!("Address {address} is not 20 bytes long")))
}

pub fn format_address(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a `0x`-prefixed hex quantity or data string from a JSON-RPC reply.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.len() % 2 == 1 {
        Ok(hex::decode(format!("0{digits}"))?)
    } else {
        Ok(hex::decode(digits)?)
    }
}

/// Return data viewed as a sequence of 32-byte words.
pub struct Words<'a> {
    data: &'a [u8],
}

impl<'a> Words<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::msg("Call returned no data"));
        }
        Ok(Self { data })
    }

    fn word_at(&self, offset: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(WORD)
            .ok_or_else(|| Error::msg("Word offset overflows"))?;
        self.data.get(offset..end).ok_or_else(|| {
            Error::msg(format!(
                "Return data too short: need {end} bytes, got {}",
                self.data.len()
            ))
        })
    }

    pub fn word(&self, index: usize) -> Result<&'a [u8]> {
        self.word_at(index * WORD)
    }

    pub fn uint(&self, index: usize) -> Result<BigUint> {
        Ok(BigUint::from_bytes_be(self.word(index)?))
    }

    fn small_uint_at(&self, offset: usize) -> Result<usize> {
        let word = self.word_at(offset)?;
        if word[..WORD - 8].iter().any(|byte| *byte != 0) {
            return Err(Error::msg("Offset or length does not fit in 64 bits"));
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&word[WORD - 8..]);
        usize::try_from(u64::from_be_bytes(tail)).map_err(Error::from)
    }

    /// `None` for the zero address.
    pub fn address(&self, index: usize) -> Result<Option<String>> {
        let word = self.word(index)?;
        if word[..WORD - 20].iter().any(|byte| *byte != 0) {
            return Err(Error::msg(format!("Word {index} is not an address")));
        }
        let address = &word[WORD - 20..];
        if address.iter().all(|byte| *byte == 0) {
            Ok(None)
        } else {
            Ok(Some(format_address(address)))
        }
    }

    pub fn bool(&self, index: usize) -> Result<bool> {
        let word = self.word(index)?;
        if word[..WORD - 1].iter().any(|byte| *byte != 0) || word[WORD - 1] > 1 {
            return Err(Error::msg(format!("Word {index} is not a bool")));
        }
        Ok(word[WORD - 1] == 1)
    }

    pub fn string(&self, index: usize) -> Result<String> {
        let offset = self.small_uint_at(index * WORD)?;
        let length = self.small_uint_at(offset)?;
        let start = offset + WORD;
        let bytes = start
            .checked_add(length)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| Error::msg(format!("String at word {index} runs past return data")))?;
        // Invalid sequences become U+FFFD so the other fields survive.
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// `projects(uint256)` returns the struct members as a flat tuple:
/// `(address owner, string description, uint256 fundingGoal,
/// uint256 amountRaised, bool withdrawn)`.
pub fn decode_project(data: &[u8]) -> Result<ProjectRecord> {
    let words = Words::new(data)?;
    let owner = words.address(0)?;
    let description = words.string(1)?;
    let funding_goal = words.uint(2)?;
    let amount_raised = words.uint(3)?;
    let withdrawn = words.bool(4)?;
    Ok(ProjectRecord::new(
        owner.as_deref(),
        &description,
        &funding_goal,
        &amount_raised,
        &withdrawn,
    ))
}

pub fn decode_uint(data: &[u8]) -> Result<BigUint> {
    Words::new(data)?.uint(0)
}
