// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for error types.

#[cfg(test)]
mod tests {
    use crate::errors::*;
    use crate::nsd::ControlError;
    use std::path::PathBuf;

    #[test]
    fn test_missing_option_error() {
        let error = ConfigError::MissingOption {
            section: "Zones",
            option: "dir",
        };

        assert_eq!(error.to_string(), "Required option 'Zones.dir' is not set");
    }

    #[test]
    fn test_invalid_port_error() {
        let error = ConfigError::InvalidPort {
            section: "NSDMaster",
            option: "controlport",
            value: "eighty".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Option 'NSDMaster.controlport' has invalid value 'eighty': expected a port number"
        );
    }

    #[test]
    fn test_file_pattern_error_is_transparent_in_config_error() {
        let error: ConfigError = FilePatternError::MissingNameToken("%1/zone".to_string()).into();

        assert_eq!(
            error.to_string(),
            "%s missing in filepattern definition '%1/zone'"
        );
    }

    #[test]
    fn test_zone_name_empty_error() {
        let error = ZoneNameError::Empty("!!!".to_string());

        assert_eq!(
            error.to_string(),
            "Zone name '!!!' contains no valid characters"
        );
    }

    #[test]
    fn test_zone_name_empty_label_error() {
        let error = ZoneNameError::EmptyLabel("..evil".to_string());

        assert_eq!(error.to_string(), "Zone name '..evil' has an empty label");
    }

    #[test]
    fn test_file_pattern_escape_error() {
        let error = FilePatternError::EscapesBaseDir("../x.zone".to_string());

        assert_eq!(
            error.to_string(),
            "Zone file path '../x.zone' escapes the zone directory"
        );
    }

    #[test]
    fn test_service_io_error_includes_path() {
        let error = ServiceError::Io {
            path: PathBuf::from("/var/lib/nsd/zones/e/example.com.zone"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        let message = error.to_string();
        assert!(message.contains("/var/lib/nsd/zones/e/example.com.zone"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_service_malformed_stats_error() {
        let error = ServiceError::MalformedStats {
            line: "garbage".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Malformed stats line 'garbage': expected key=value"
        );
    }

    #[test]
    fn test_service_control_error_is_transparent() {
        let error: ServiceError = ControlError::InvalidServerName("bad host".to_string()).into();

        assert_eq!(error.to_string(), "Invalid control host name 'bad host'");
    }

    #[test]
    fn test_rpc_error_codes() {
        assert_eq!(RpcError::Parse("eof".to_string()).code(), -32700);
        assert_eq!(RpcError::InvalidRequest("not an object".to_string()).code(), -32600);
        assert_eq!(RpcError::MethodNotFound("dropZone".to_string()).code(), -32601);
        assert_eq!(RpcError::InvalidParams("missing field `name`".to_string()).code(), -32602);
        assert_eq!(RpcError::Aborted("panicked".to_string()).code(), -32603);

        let service: RpcError = ServiceError::MalformedStats {
            line: "x".to_string(),
        }
        .into();
        assert_eq!(service.code(), -32603);
    }

    #[test]
    fn test_rpc_service_error_is_transparent() {
        let error: RpcError = ServiceError::MalformedStats {
            line: "x".to_string(),
        }
        .into();

        assert_eq!(error.to_string(), "Malformed stats line 'x': expected key=value");
    }

    #[test]
    fn test_rpc_method_not_found_message() {
        assert_eq!(
            RpcError::MethodNotFound("dropZone".to_string()).to_string(),
            "Method not found: dropZone"
        );
    }
}
