/// Checks whether a hostname is covered by the domain allow-list
///
/// A hostname is accepted when it equals an allow-list entry exactly or is
/// a subdomain of one (dot-suffix match). Matching is done on lowercased
/// strings, so callers should pass hostnames as extracted from a parsed URL.
///
/// # Examples
///
/// ```
/// use vgm_scraper::url::domain_allowed;
///
/// let allowed = vec!["khinsider.com".to_string()];
///
/// assert!(domain_allowed("khinsider.com", &allowed));
/// assert!(domain_allowed("downloads.khinsider.com", &allowed));
/// assert!(!domain_allowed("evil.example", &allowed));
/// assert!(!domain_allowed("notkhinsider.com", &allowed));
/// ```
pub fn domain_allowed(hostname: &str, allowed_domains: &[String]) -> bool {
    let hostname = hostname.to_lowercase();

    allowed_domains.iter().any(|domain| {
        let domain = domain.to_lowercase();
        hostname == domain || hostname.ends_with(&format!(".{}", domain))
    })
}
