//! User agent string sent with every request.

/// Library identifier, e.g. `BeamClient/0.1.0`.
pub fn library_agent() -> String {
    format!("BeamClient/{}", env!("CARGO_PKG_VERSION"))
}

/// Build the user agent.
///
/// With a host agent (an embedding webview or application) the library
/// identifier is appended to it; otherwise the Rust toolchain and target the
/// crate was built with are reported.
pub fn build_user_agent(host_agent: Option<&str>) -> String {
    let client = library_agent();

    match host_agent.map(str::trim).filter(|agent| !agent.is_empty()) {
        Some(host) => format!("{} {}", host, client),
        None => format!(
            "{} (Rust; rustc {}; {})",
            client,
            env!("BEAM_RUSTC_VERSION"),
            env!("BEAM_BUILD_TARGET")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_agent() {
        assert_eq!(library_agent(), format!("BeamClient/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_native_agent() {
        let agent = build_user_agent(None);
        assert!(agent.starts_with("BeamClient/"));
        assert!(agent.contains("(Rust; rustc "));
        assert!(agent.ends_with(')'));
    }

    #[test]
    fn test_host_agent() {
        let agent = build_user_agent(Some("Mozilla/5.0 (X11)"));
        assert_eq!(agent, format!("Mozilla/5.0 (X11) {}", library_agent()));
    }

    #[test]
    fn test_blank_host_agent_ignored() {
        assert_eq!(build_user_agent(Some("  ")), build_user_agent(None));
    }
}
