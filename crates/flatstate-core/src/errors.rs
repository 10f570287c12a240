use crate::schema::ValueType;
use thiserror::Error;

/// Result type alias using FieldError
pub type Result<T> = std::result::Result<T, FieldError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a reader can surface falls into one of these kinds. Each
/// kind maps to a stable code usable for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// No schema node resolves for an address, or a scalar was traversed
    InvalidAddress,
    /// A flat payload failed to parse for its Kind
    Decode,
    /// A container schema node is malformed
    InvalidSchema,
    /// Caller supplied something outside the reader's vocabulary
    InvalidInput,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidAddress => "ERR_INVALID_ADDRESS",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
        }
    }
}

/// Canonical structured error type
///
/// Classification plus the context needed to find the offending field:
/// the operation, the dotted address that was read, and the flat key whose
/// payload or shape was at fault.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    address: Option<String>,
    key: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            address: None,
            key: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the field address being read
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Add the flat key at fault
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(address) = &self.address {
            write!(f, " (address: {})", address)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failures raised while resolving or decoding a field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    // ===== Address errors =====
    /// No schema node exists for this address prefix
    #[error("no schema for address: {address}")]
    AddressNotFound { address: String },

    /// The address continues below a node that has no children
    #[error("cannot traverse into {kind} at {address}")]
    InvalidTraversal { address: String, kind: ValueType },

    // ===== Decode errors =====
    /// A flat payload does not parse for its Kind
    #[error("cannot decode {raw:?} as {expected} at {key}")]
    Decode {
        key: String,
        expected: ValueType,
        raw: String,
    },

    /// A value handed to the encoder does not match its schema Kind
    #[error("expected {expected} at {key}, found {found}")]
    ValueMismatch {
        key: String,
        expected: ValueType,
        found: String,
    },

    /// A set element key segment is not an integer identity
    #[error("set identity {segment:?} is not an integer at {key}")]
    InvalidIdentity { key: String, segment: String },

    // ===== Schema errors =====
    /// A List/Map/Set node has no element schema
    #[error("{kind} at {address} has no element schema")]
    MissingElem { address: String, kind: ValueType },

    /// A Set node has no identity function
    #[error("set at {address} has no identity function")]
    MissingSetFn { address: String },

    /// A Map node's element is not a scalar
    #[error("map at {address} must have a scalar element, found {elem}")]
    InvalidMapElem { address: String, elem: ValueType },

    // ===== Reader composition =====
    /// A multi-level read named a level that was never declared
    #[error("unknown level: {level}")]
    UnknownLevel { level: String },
}

impl FieldError {
    /// Classify this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            FieldError::AddressNotFound { .. } | FieldError::InvalidTraversal { .. } => {
                ExErrorKind::InvalidAddress
            }
            FieldError::Decode { .. }
            | FieldError::ValueMismatch { .. }
            | FieldError::InvalidIdentity { .. } => ExErrorKind::Decode,
            FieldError::MissingElem { .. }
            | FieldError::MissingSetFn { .. }
            | FieldError::InvalidMapElem { .. } => ExErrorKind::InvalidSchema,
            FieldError::UnknownLevel { .. } => ExErrorKind::InvalidInput,
        }
    }

    /// True for failures resolving an address against the schema
    pub fn is_address_error(&self) -> bool {
        self.kind() == ExErrorKind::InvalidAddress
    }

    /// True for failures parsing a flat payload
    pub fn is_decode_error(&self) -> bool {
        self.kind() == ExErrorKind::Decode
    }

    /// True for malformed container schema nodes
    pub fn is_schema_error(&self) -> bool {
        self.kind() == ExErrorKind::InvalidSchema
    }
}

impl From<FieldError> for ExError {
    fn from(err: FieldError) -> Self {
        let message = err.to_string();
        match err {
            FieldError::AddressNotFound { address } => {
                ExError::new(ExErrorKind::InvalidAddress).with_address(address)
            }
            FieldError::InvalidTraversal { address, .. } => {
                ExError::new(ExErrorKind::InvalidAddress).with_address(address)
            }
            FieldError::Decode { key, .. } => ExError::new(ExErrorKind::Decode).with_key(key),
            FieldError::ValueMismatch { key, .. } | FieldError::InvalidIdentity { key, .. } => {
                ExError::new(ExErrorKind::Decode).with_key(key)
            }
            FieldError::MissingElem { address, .. }
            | FieldError::MissingSetFn { address }
            | FieldError::InvalidMapElem { address, .. } => {
                ExError::new(ExErrorKind::InvalidSchema).with_address(address)
            }
            FieldError::UnknownLevel { .. } => ExError::new(ExErrorKind::InvalidInput),
        }
        .with_message(message)
    }
}
