use crate::{ErrorCode, WealthlensError};

impl From<std::io::Error> for WealthlensError {
    fn from(err: std::io::Error) -> Self {
        WealthlensError::new(ErrorCode::Internal, err.to_string())
    }
}

impl From<serde_json::Error> for WealthlensError {
    fn from(err: serde_json::Error) -> Self {
        WealthlensError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<serde_yaml::Error> for WealthlensError {
    fn from(err: serde_yaml::Error) -> Self {
        WealthlensError::new(ErrorCode::InvalidConfig, err.to_string())
    }
}

impl ErrorCode {
    /// Classify a warehouse failure by its vendor error code and ANSI SQL state.
    ///
    /// The vendor code wins when both are present. Anything unrecognised is
    /// an `ExecutionFailed`.
    pub fn from_warehouse(vendor_code: Option<&str>, sql_state: Option<&str>) -> Self {
        match vendor_code {
            Some("001003") => return Self::SyntaxError,
            Some("002003") | Some("000904") => return Self::ObjectNotFound,
            Some("003001") | Some("003003") => return Self::PermissionDenied,
            Some("000630") | Some("000604") => return Self::StatementTimeout,
            _ => {}
        }
        match sql_state {
            Some("42000") | Some("42601") => Self::SyntaxError,
            Some("42S02") | Some("42S22") | Some("02000") => Self::ObjectNotFound,
            Some("42501") => Self::PermissionDenied,
            Some("57014") => Self::StatementTimeout,
            _ => Self::ExecutionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_code_mapping() {
        assert_eq!(
            ErrorCode::from_warehouse(Some("001003"), Some("42000")),
            ErrorCode::SyntaxError
        );
        assert_eq!(
            ErrorCode::from_warehouse(Some("002003"), None),
            ErrorCode::ObjectNotFound
        );
        assert_eq!(
            ErrorCode::from_warehouse(None, Some("42501")),
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            ErrorCode::from_warehouse(Some("000630"), Some("57014")),
            ErrorCode::StatementTimeout
        );
        assert_eq!(
            ErrorCode::from_warehouse(Some("100038"), Some("22018")),
            ErrorCode::ExecutionFailed
        );
        assert_eq!(ErrorCode::from_warehouse(None, None), ErrorCode::ExecutionFailed);
    }

    #[test]
    fn test_io_error_mapping() {
        let io_err = std::io::Error::other("disk gone");
        let err: WealthlensError = io_err.into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.message.contains("disk gone"));
    }

    #[test]
    fn test_yaml_error_mapping() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{ not: a list").unwrap_err();
        let err: WealthlensError = yaml_err.into();
        assert_eq!(err.code, ErrorCode::InvalidConfig);
    }
}
