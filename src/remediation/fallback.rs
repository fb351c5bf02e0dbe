use std::sync::LazyLock;

use regex::Regex;

/// A hand-authored remediation keyed by vulnerability keywords.
pub struct FixPattern {
    pub name: &'static str,
    /// Keywords, matched case-insensitively as whole words.
    pub keywords: &'static [&'static str],
    pub remediation: &'static str,
}

/// Ordered pattern library. The first entry with a matching keyword wins, so
/// a description naming both a hardcoded secret and SQL injection resolves
/// to SQL injection.
pub const FIX_PATTERNS: &[FixPattern] = &[
    FixPattern {
        name: "eval",
        keywords: &["eval"],
        remediation: "HOW TO FIX: Never pass untrusted input to eval() or equivalent dynamic code execution \
(new Function, setTimeout with strings, exec). Replace dynamic evaluation with explicit parsing \
(e.g. JSON.parse) or a dispatch table of allowed operations. If dynamic behaviour is unavoidable, \
validate input against a strict allow-list and run it in a sandbox without access to secrets.",
    },
    FixPattern {
        name: "sql injection",
        keywords: &["sql injection", "sqli"],
        remediation: "HOW TO FIX: Use parameterized queries or prepared statements for every database call; \
never build SQL by concatenating user input. Use an ORM or query builder that binds parameters, \
validate input types and lengths, and run the application with a least-privilege database account.",
    },
    FixPattern {
        name: "xss",
        keywords: &["xss", "cross-site scripting", "cross site scripting"],
        remediation: "HOW TO FIX: Context-encode all untrusted data on output (HTML body, attributes, \
JavaScript, URLs). Prefer templating engines that auto-escape, avoid innerHTML and document.write \
with user data, sanitize rich HTML with a vetted library, and deploy a Content-Security-Policy such as \
\"default-src 'self'; script-src 'self'; object-src 'none'; base-uri 'self'\" to block injected scripts.",
    },
    FixPattern {
        name: "path traversal",
        keywords: &["path traversal", "directory traversal"],
        remediation: "HOW TO FIX: Never use raw user input in file paths. Map user-supplied identifiers to \
server-side paths through an allow-list, canonicalize the resolved path and verify it stays inside the \
intended base directory, and reject input containing '..', absolute paths or encoded separators.",
    },
    FixPattern {
        name: "hardcoded secret",
        keywords: &["hardcoded", "hard-coded", "hardcoded secret"],
        remediation: "HOW TO FIX: Remove secrets from source code and configuration committed to version \
control. Load them at runtime from environment variables or a secrets manager, rotate any credential \
that was exposed, and add secret scanning to CI to stop regressions.",
    },
    FixPattern {
        name: "content security policy",
        keywords: &["content-security-policy", "content security policy", "csp"],
        remediation: "HOW TO FIX: Send a Content-Security-Policy header on every HTML response. Start from \
\"default-src 'self'; object-src 'none'; frame-ancestors 'self'; base-uri 'self'\", avoid 'unsafe-inline' \
and 'unsafe-eval', use nonces or hashes for required inline scripts, and roll out with \
Content-Security-Policy-Report-Only first to catch breakage.",
    },
    FixPattern {
        name: "clickjacking",
        keywords: &["x-frame-options", "clickjacking", "frame-ancestors"],
        remediation: "HOW TO FIX: Send \"X-Frame-Options: DENY\" (or SAMEORIGIN if the site frames itself) \
and the equivalent CSP directive \"frame-ancestors 'none'\" so the page cannot be embedded by other origins.",
    },
    FixPattern {
        name: "hsts",
        keywords: &["strict-transport-security", "hsts"],
        remediation: "HOW TO FIX: Serve \"Strict-Transport-Security: max-age=31536000; includeSubDomains\" \
over HTTPS responses once every subdomain supports TLS, then consider HSTS preload. Redirect all HTTP \
requests to HTTPS with a permanent redirect.",
    },
    FixPattern {
        name: "mime sniffing",
        keywords: &["x-content-type-options", "nosniff", "mime-sniff"],
        remediation: "HOW TO FIX: Send \"X-Content-Type-Options: nosniff\" on every response and make sure \
each response declares an accurate Content-Type, so browsers never reinterpret uploads or JSON as script.",
    },
    FixPattern {
        name: "transport security",
        keywords: &["https", "tls", "plain http"],
        remediation: "HOW TO FIX: Serve the whole site over HTTPS with a certificate from a trusted CA \
(e.g. automated via ACME/Let's Encrypt), redirect every HTTP request to HTTPS, disable TLS versions \
below 1.2, mark cookies Secure, and add HSTS once HTTPS is stable.",
    },
];

/// Returned when no keyword matches.
pub const GENERIC_CHECKLIST: &str = "GENERAL SECURE CODING CHECKLIST:\n\
1. Validate all input on the server against an allow-list of expected types, lengths and formats.\n\
2. Encode output for the context it is rendered in (HTML, attribute, JavaScript, URL).\n\
3. Use parameterized queries and safe APIs instead of string-built commands.\n\
4. Enforce authentication and authorization on every request, server side.\n\
5. Keep secrets out of source code; load them from a secrets manager.\n\
6. Serve everything over HTTPS and send security headers (CSP, HSTS, X-Frame-Options, X-Content-Type-Options).\n\
7. Keep dependencies patched and log security-relevant events without leaking sensitive data.";

/// One case-insensitive matcher per entry of `FIX_PATTERNS`. A keyword must
/// not touch a letter or digit on either side; `_` and punctuation separate
/// words, so identifiers like `HARDCODED_SECRET` still match.
static KEYWORD_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FIX_PATTERNS
        .iter()
        .map(|p| {
            let alternatives: Vec<String> = p.keywords.iter().map(|k| regex::escape(k)).collect();
            let pattern = format!(
                r"(?i)(?:^|[^a-zA-Z0-9])(?:{})(?:$|[^a-zA-Z0-9])",
                alternatives.join("|")
            );
            Regex::new(&pattern).expect("static keyword pattern")
        })
        .collect()
});

/// First-match-wins lookup in library order.
pub fn match_pattern(description: &str) -> Option<&'static FixPattern> {
    FIX_PATTERNS
        .iter()
        .zip(KEYWORD_MATCHERS.iter())
        .find(|(_, matcher)| matcher.is_match(description))
        .map(|(pattern, _)| pattern)
}

/// Guidance for `description`, never empty.
pub fn fallback_guidance(description: &str) -> &'static str {
    match_pattern(description)
        .map(|p| p.remediation)
        .unwrap_or(GENERIC_CHECKLIST)
}
