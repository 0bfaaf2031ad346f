//! Input loading shared by all commands.

use std::io::{self, Read};

use sharedcart_core::SettlementRequest;
use thiserror::Error;

/// Errors raised while loading command input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {source_name}: {error}")]
    Read {
        source_name: String,
        error: io::Error,
    },
    #[error("{source_name} is {size} bytes, exceeding maximum {max} bytes")]
    TooLarge {
        source_name: String,
        size: u64,
        max: u64,
    },
    #[error("request has {count} bills, exceeding maximum {max}")]
    TooManyBills { count: usize, max: usize },
}

/// Reads a file, or stdin when `path` is `None`, enforcing `max_size`.
pub fn read_input(path: Option<&str>, max_size: Option<u64>) -> Result<String, InputError> {
    let source_name = path.unwrap_or("stdin").to_string();
    let read_err = |error: io::Error| InputError::Read {
        source_name: source_name.clone(),
        error,
    };

    if let (Some(path), Some(max)) = (path, max_size) {
        let size = std::fs::metadata(path).map_err(read_err)?.len();
        if size > max {
            return Err(InputError::TooLarge {
                source_name: source_name.clone(),
                size,
                max,
            });
        }
    }

    let mut buffer = String::new();
    match path {
        Some(path) => {
            std::fs::File::open(path)
                .and_then(|mut f| f.read_to_string(&mut buffer))
                .map_err(read_err)?;
        }
        None => {
            io::stdin().read_to_string(&mut buffer).map_err(read_err)?;
        }
    }

    if let Some(max) = max_size {
        let size = buffer.len() as u64;
        if size > max {
            return Err(InputError::TooLarge {
                source_name,
                size,
                max,
            });
        }
    }
    Ok(buffer)
}

/// Loads and parses a settlement request.
pub fn load_request(
    path: Option<&str>,
    max_size: Option<u64>,
) -> Result<SettlementRequest, Box<dyn std::error::Error>> {
    let raw = read_input(path, max_size)?;
    let request = SettlementRequest::from_json(&raw)?;
    tracing::info!(
        source = path.unwrap_or("stdin"),
        members = request.members.len(),
        bills = request.bills.len(),
        "loaded settlement request"
    );
    Ok(request)
}

/// Rejects requests above the caller's bill bound.
pub fn check_bill_limit(
    request: &SettlementRequest,
    max_bills: Option<usize>,
) -> Result<(), InputError> {
    match max_bills {
        Some(max) if request.bills.len() > max => Err(InputError::TooManyBills {
            count: request.bills.len(),
            max,
        }),
        _ => Ok(()),
    }
}
