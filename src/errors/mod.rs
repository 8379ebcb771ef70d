/// Structured error handling for bsclens
///
/// One top-level `LensError` with nested category enums. Validation failures
/// never touch the network; fetch failures keep the upstream status and
/// message verbatim so callers can diagnose provider issues directly.

/// Convenience alias used throughout the crate
pub type LensResult<T> = Result<T, LensError>;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone)]
pub enum LensError {
    // Malformed address/domain/parameter, rejected before any network call
    Validation(ValidationError),

    // Upstream HTTP or application-level failure
    Fetch(FetchError),

    // Token metadata lookup returned no such contract
    TokenNotFound { address: String },

    // A required upstream step failed during portfolio normalization
    Aggregation(AggregationError),
}

impl std::fmt::Display for LensError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensError::Validation(e) => write!(f, "Validation Error: {}", e),
            LensError::Fetch(e) => write!(f, "Fetch Error: {}", e),
            LensError::TokenNotFound { address } => {
                write!(f, "Token not found: {}", address)
            }
            LensError::Aggregation(e) => write!(f, "Aggregation Error: {}", e),
        }
    }
}

impl std::error::Error for LensError {}

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidAddress {
        address: String,
    },
    InvalidDomain {
        domain: String,
    },
    InvalidParameter {
        field: String,
        reason: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidAddress { address } => {
                write!(
                    f,
                    "Invalid address '{}': must be 0x followed by 40 hex characters",
                    address
                )
            }
            ValidationError::InvalidDomain { domain } => {
                write!(f, "Invalid domain '{}': must be a .bnb name", domain)
            }
            ValidationError::InvalidParameter { field, reason } => {
                write!(f, "Invalid parameter '{}': {}", field, reason)
            }
        }
    }
}

// =============================================================================
// FETCH ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum FetchError {
    /// Non-success HTTP status; body carries the upstream error text verbatim
    HttpStatus {
        provider: String,
        endpoint: String,
        status: u16,
        body: String,
    },
    /// HTTP 429, distinguished so callers can apply their own backoff policy
    RateLimited {
        provider: String,
        endpoint: String,
    },
    /// Application-level failure inside a 200 response
    /// (explorer envelope with status != "1", JSON-RPC error object)
    Upstream {
        provider: String,
        message: String,
    },
    /// Connection/transport failure before any response arrived
    Transport {
        provider: String,
        message: String,
    },
    /// Response arrived but did not decode into the expected shape
    Parse {
        provider: String,
        message: String,
    },
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::HttpStatus {
                provider,
                endpoint,
                status,
                body,
            } => {
                write!(f, "{} HTTP {} at {}: {}", provider, status, endpoint, body)
            }
            FetchError::RateLimited { provider, endpoint } => {
                write!(f, "{} rate limited at {}", provider, endpoint)
            }
            FetchError::Upstream { provider, message } => {
                write!(f, "{} upstream error: {}", provider, message)
            }
            FetchError::Transport { provider, message } => {
                write!(f, "{} transport error: {}", provider, message)
            }
            FetchError::Parse { provider, message } => {
                write!(f, "{} parse error: {}", provider, message)
            }
        }
    }
}

// =============================================================================
// AGGREGATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum AggregationError {
    RequiredFetchFailed {
        step: String,
        message: String,
    },
}

impl std::fmt::Display for AggregationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationError::RequiredFetchFailed { step, message } => {
                write!(f, "required step '{}' failed: {}", step, message)
            }
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<ValidationError> for LensError {
    fn from(err: ValidationError) -> Self {
        LensError::Validation(err)
    }
}

impl From<FetchError> for LensError {
    fn from(err: FetchError) -> Self {
        LensError::Fetch(err)
    }
}

impl From<AggregationError> for LensError {
    fn from(err: AggregationError) -> Self {
        LensError::Aggregation(err)
    }
}

impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        LensError::Fetch(FetchError::Parse {
            provider: "local".to_string(),
            message: err.to_string(),
        })
    }
}

// =============================================================================
// STRUCTURED ERROR BUILDERS
// =============================================================================

impl LensError {
    pub fn invalid_address(address: impl Into<String>) -> Self {
        LensError::Validation(ValidationError::InvalidAddress {
            address: address.into(),
        })
    }

    pub fn invalid_domain(domain: impl Into<String>) -> Self {
        LensError::Validation(ValidationError::InvalidDomain {
            domain: domain.into(),
        })
    }

    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LensError::Validation(ValidationError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        })
    }

    pub fn token_not_found(address: impl Into<String>) -> Self {
        LensError::TokenNotFound {
            address: address.into(),
        }
    }

    pub fn required_fetch_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        LensError::Aggregation(AggregationError::RequiredFetchFailed {
            step: step.into(),
            message: message.into(),
        })
    }

    /// True when the root cause is an upstream 429
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LensError::Fetch(e) if e.is_rate_limited())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_keeps_upstream_body_verbatim() {
        let err = LensError::Fetch(FetchError::HttpStatus {
            provider: "bscscan".to_string(),
            endpoint: "tokeninfo".to_string(),
            status: 502,
            body: "Max rate limit reached".to_string(),
        });
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("Max rate limit reached"));
    }

    #[test]
    fn rate_limited_is_distinguished() {
        let err = LensError::Fetch(FetchError::RateLimited {
            provider: "rpc".to_string(),
            endpoint: "eth_getBalance".to_string(),
        });
        assert!(err.is_rate_limited());

        let other = LensError::invalid_address("0x123");
        assert!(!other.is_rate_limited());
    }
}
