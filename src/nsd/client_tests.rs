// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for the NSD control client (request framing, response reading, setup errors).

#[cfg(test)]
mod tests {
    use crate::config::NsdMasterConfig;
    use crate::nsd::client::{exchange, format_request};
    use crate::nsd::{ControlCommand, ControlError, NsdControlClient};
    use std::io::{self, Cursor, ErrorKind, Read, Write};
    use std::path::PathBuf;

    /// In-memory stream: serves `input`, records writes, optionally fails at EOF.
    struct FakeStream {
        input: Cursor<Vec<u8>>,
        written: Vec<u8>,
        eof_error: Option<ErrorKind>,
    }

    impl FakeStream {
        fn new(response: &str) -> Self {
            Self {
                input: Cursor::new(response.as_bytes().to_vec()),
                written: Vec::new(),
                eof_error: None,
            }
        }

        fn failing_at_eof(response: &str, kind: ErrorKind) -> Self {
            Self {
                eof_error: Some(kind),
                ..Self::new(response)
            }
        }
    }

    impl Read for FakeStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.input.read(buf)?;
            if n == 0 {
                if let Some(kind) = self.eof_error.take() {
                    return Err(io::Error::new(kind, "peer closed connection"));
                }
            }
            Ok(n)
        }
    }

    impl Write for FakeStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn master_config() -> NsdMasterConfig {
        NsdMasterConfig {
            client_cert: PathBuf::from("/nonexistent/nsd_control.pem"),
            client_key: PathBuf::from("/nonexistent/nsd_control.key"),
            server_cert: None,
            control_host: "localhost".to_string(),
            control_port: 8952,
        }
    }

    // =====================================================
    // Request Framing Tests
    // =====================================================

    #[test]
    fn test_format_request_with_args() {
        assert_eq!(
            format_request(ControlCommand::AddZone, &["example.com", "slave"]),
            "NSDCT1 addzone example.com slave\n"
        );
    }

    #[test]
    fn test_format_request_without_args() {
        assert_eq!(
            format_request(ControlCommand::StatsNoReset, &[]),
            "NSDCT1 stats_noreset\n"
        );
    }

    // =====================================================
    // Exchange Tests
    // =====================================================

    #[test]
    fn test_exchange_writes_request_and_trims_response() {
        let mut stream = FakeStream::new("ok\n");

        let response = exchange(&mut stream, "NSDCT1 reload example.com\n").unwrap();

        assert_eq!(response, "ok");
        assert_eq!(stream.written, b"NSDCT1 reload example.com\n");
    }

    #[test]
    fn test_exchange_keeps_multiline_body() {
        let mut stream = FakeStream::new("num.queries=10\nnum.zones=2\n\n");

        let response = exchange(&mut stream, "NSDCT1 stats\n").unwrap();

        assert_eq!(response, "num.queries=10\nnum.zones=2");
    }

    #[test]
    fn test_exchange_returns_error_text_as_response() {
        let mut stream = FakeStream::new("error zone example.com not found\n");

        let response = exchange(&mut stream, "NSDCT1 zonestatus example.com\n").unwrap();

        assert_eq!(response, "error zone example.com not found");
    }

    #[test]
    fn test_exchange_tolerates_eof_without_close_notify() {
        let mut stream = FakeStream::failing_at_eof("ok\n", ErrorKind::UnexpectedEof);

        assert_eq!(exchange(&mut stream, "NSDCT1 reconfig\n").unwrap(), "ok");
    }

    #[test]
    fn test_exchange_eof_before_any_data_is_an_error() {
        let mut stream = FakeStream::failing_at_eof("", ErrorKind::UnexpectedEof);

        let err = exchange(&mut stream, "NSDCT1 reconfig\n").unwrap_err();
        assert!(matches!(err, ControlError::Io(e) if e.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_exchange_propagates_read_errors() {
        let mut stream = FakeStream::failing_at_eof("partial", ErrorKind::ConnectionReset);

        assert!(matches!(
            exchange(&mut stream, "NSDCT1 stats\n"),
            Err(ControlError::Io(_))
        ));
    }

    #[test]
    fn test_exchange_empty_response() {
        let mut stream = FakeStream::new("");

        assert_eq!(exchange(&mut stream, "NSDCT1 notify example.com\n").unwrap(), "");
    }

    // =====================================================
    // Client Construction Tests
    // =====================================================

    #[test]
    fn test_from_config_rejects_invalid_host() {
        let config = NsdMasterConfig {
            control_host: "not a host".to_string(),
            ..master_config()
        };

        assert!(matches!(
            NsdControlClient::from_config(&config),
            Err(ControlError::InvalidServerName(host)) if host == "not a host"
        ));
    }

    #[test]
    fn test_from_config_missing_client_cert() {
        let err = NsdControlClient::from_config(&master_config()).unwrap_err();

        assert!(matches!(
            err,
            ControlError::Certificate { path, .. } if path == PathBuf::from("/nonexistent/nsd_control.pem")
        ));
    }

    #[test]
    fn test_from_config_empty_server_cert() {
        let empty = tempfile::NamedTempFile::new().unwrap();
        let config = NsdMasterConfig {
            server_cert: Some(empty.path().to_path_buf()),
            ..master_config()
        };

        let err = NsdControlClient::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ControlError::Certificate { reason, .. } if reason == "no certificates found"
        ));
    }
}
