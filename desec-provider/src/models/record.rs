//! Generic record model shared with the orchestrator.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{label_to_fqdn, normalize_domain_name, trim_domain_name};

/// Maximum length of a single TXT character-string.
const TXT_CHUNK_LEN: usize = 255;

/// Errors raised while parsing or normalizing record content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// The record type is not part of the generic model.
    #[error("unsupported record type: {0}")]
    UnsupportedType(String),

    /// The presentation-format value could not be parsed.
    #[error("malformed {record_type} content {content:?}: {detail}")]
    Malformed {
        record_type: RecordType,
        content: String,
        detail: String,
    },

    /// A name could not be converted to its ASCII form.
    #[error("invalid domain name {name:?}")]
    InvalidName { name: String },
}

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
    /// DANE TLS association record.
    Tlsa,
    /// Pointer record.
    Ptr,
    /// Apex alias pseudo-record (provider-side flattening).
    Alias,
}

impl RecordType {
    /// Uppercase wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Tlsa => "TLSA",
            Self::Ptr => "PTR",
            Self::Alias => "ALIAS",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "NS" => Ok(Self::Ns),
            "SRV" => Ok(Self::Srv),
            "CAA" => Ok(Self::Caa),
            "TLSA" => Ok(Self::Tlsa),
            "PTR" => Ok(Self::Ptr),
            "ALIAS" => Ok(Self::Alias),
            _ => Err(ContentError::UnsupportedType(s.to_string())),
        }
    }
}

/// Type-safe representation of record data.
///
/// Name-valued fields (targets, exchanges, name servers) are fully qualified and carry the
/// trailing dot, the way they appear in zone files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// A record.
    A {
        /// IPv4 address (e.g., `"1.2.3.4"`).
        address: String,
    },

    /// AAAA record.
    AAAA {
        /// IPv6 address (e.g., `"2001:db8::1"`).
        address: String,
    },

    /// CNAME record.
    CNAME {
        /// Target hostname.
        target: String,
    },

    /// MX record.
    MX {
        /// Preference (lower = preferred).
        priority: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// TXT record. Long text is split into 255-byte character-strings on the wire.
    TXT {
        /// Unquoted text content.
        text: String,
    },

    /// NS record.
    NS {
        /// Name server hostname.
        nameserver: String,
    },

    /// SRV record.
    SRV {
        /// Priority (lower = preferred).
        priority: u16,
        /// Weight for load balancing among same-priority targets.
        weight: u16,
        /// TCP/UDP port number.
        port: u16,
        /// Target hostname providing the service.
        target: String,
    },

    /// CAA record.
    CAA {
        /// Issuer critical flag (0 or 128).
        flags: u8,
        /// Property tag (`"issue"`, `"issuewild"`, or `"iodef"`).
        tag: String,
        /// CA domain or reporting URI.
        value: String,
    },

    /// TLSA record.
    TLSA {
        /// Certificate usage (0-3).
        usage: u8,
        /// Selector (0 = full certificate, 1 = public key).
        selector: u8,
        /// Matching type (0 = exact, 1 = SHA-256, 2 = SHA-512).
        matching_type: u8,
        /// Hex-encoded association data.
        certificate: String,
    },

    /// PTR record.
    PTR {
        /// Target hostname.
        target: String,
    },

    /// ALIAS pseudo-record.
    ALIAS {
        /// Target hostname.
        target: String,
    },
}

impl RecordData {
    /// Returns the [`RecordType`] discriminant for this record data.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::AAAA { .. } => RecordType::Aaaa,
            Self::CNAME { .. } => RecordType::Cname,
            Self::MX { .. } => RecordType::Mx,
            Self::TXT { .. } => RecordType::Txt,
            Self::NS { .. } => RecordType::Ns,
            Self::SRV { .. } => RecordType::Srv,
            Self::CAA { .. } => RecordType::Caa,
            Self::TLSA { .. } => RecordType::Tlsa,
            Self::PTR { .. } => RecordType::Ptr,
            Self::ALIAS { .. } => RecordType::Alias,
        }
    }

    /// Encodes the value in zone-file presentation format.
    ///
    /// Addresses are in canonical form, hostnames are lowercased and TLSA data is lowercase
    /// hex, so two equivalent values always encode to the same string.
    pub fn to_content(&self) -> String {
        match self {
            Self::A { address } => canonical_address::<Ipv4Addr>(address),
            Self::AAAA { address } => canonical_address::<Ipv6Addr>(address),
            Self::CNAME { target } | Self::PTR { target } | Self::ALIAS { target } => {
                target.to_ascii_lowercase()
            }
            Self::NS { nameserver } => nameserver.to_ascii_lowercase(),
            Self::MX { priority, exchange } => {
                format!("{priority} {}", exchange.to_ascii_lowercase())
            }
            Self::TXT { text } => encode_txt(text),
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => format!(
                "{priority} {weight} {port} {}",
                target.to_ascii_lowercase()
            ),
            Self::CAA { flags, tag, value } => {
                format!("{flags} {tag} {}", quote(value))
            }
            Self::TLSA {
                usage,
                selector,
                matching_type,
                certificate,
            } => format!(
                "{usage} {selector} {matching_type} {}",
                certificate.to_ascii_lowercase()
            ),
        }
    }

    /// Parses a presentation-format value of the given type.
    pub fn parse(record_type: RecordType, content: &str) -> Result<Self, ContentError> {
        let malformed = |detail: &str| ContentError::Malformed {
            record_type,
            content: content.to_string(),
            detail: detail.to_string(),
        };
        let mut fields = content.split_whitespace();
        let mut next_field = |name: &str| {
            fields
                .next()
                .ok_or_else(|| malformed(&format!("missing {name}")))
        };

        let data = match record_type {
            RecordType::A => Self::A {
                address: next_field("address")?
                    .parse::<Ipv4Addr>()
                    .map_err(|e| malformed(&e.to_string()))?
                    .to_string(),
            },
            RecordType::Aaaa => Self::AAAA {
                address: next_field("address")?
                    .parse::<Ipv6Addr>()
                    .map_err(|e| malformed(&e.to_string()))?
                    .to_string(),
            },
            RecordType::Cname => Self::CNAME {
                target: next_field("target")?.to_ascii_lowercase(),
            },
            RecordType::Ptr => Self::PTR {
                target: next_field("target")?.to_ascii_lowercase(),
            },
            RecordType::Alias => Self::ALIAS {
                target: next_field("target")?.to_ascii_lowercase(),
            },
            RecordType::Ns => Self::NS {
                nameserver: next_field("nameserver")?.to_ascii_lowercase(),
            },
            RecordType::Mx => Self::MX {
                priority: parse_number(next_field("priority")?, &malformed)?,
                exchange: next_field("exchange")?.to_ascii_lowercase(),
            },
            RecordType::Srv => Self::SRV {
                priority: parse_number(next_field("priority")?, &malformed)?,
                weight: parse_number(next_field("weight")?, &malformed)?,
                port: parse_number(next_field("port")?, &malformed)?,
                target: next_field("target")?.to_ascii_lowercase(),
            },
            RecordType::Tlsa => {
                let usage = parse_number(next_field("usage")?, &malformed)?;
                let selector = parse_number(next_field("selector")?, &malformed)?;
                let matching_type = parse_number(next_field("matching type")?, &malformed)?;
                let certificate: String = fields.collect();
                if certificate.is_empty() {
                    return Err(malformed("missing certificate data"));
                }
                Self::TLSA {
                    usage,
                    selector,
                    matching_type,
                    certificate: certificate.to_ascii_lowercase(),
                }
            }
            RecordType::Caa => {
                let (flags, rest) = split_token(content).ok_or_else(|| malformed("missing flags"))?;
                let (tag, value) = split_token(rest).ok_or_else(|| malformed("missing tag"))?;
                if value.is_empty() {
                    return Err(malformed("missing value"));
                }
                Self::CAA {
                    flags: parse_number(flags, &malformed)?,
                    tag: tag.to_string(),
                    value: unquote_all(value).map_err(|d| malformed(d))?,
                }
            }
            RecordType::Txt => Self::TXT {
                text: unquote_all(content).map_err(|d| malformed(d))?,
            },
        };
        Ok(data)
    }

    /// Mutable access to the hostname carried by name-valued types.
    pub(crate) fn hostname_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::CNAME { target }
            | Self::PTR { target }
            | Self::ALIAS { target }
            | Self::SRV { target, .. } => Some(target),
            Self::MX { exchange, .. } => Some(exchange),
            Self::NS { nameserver } => Some(nameserver),
            Self::A { .. }
            | Self::AAAA { .. }
            | Self::TXT { .. }
            | Self::CAA { .. }
            | Self::TLSA { .. } => None,
        }
    }
}

/// `2001:DB8:0:0::1` and `2001:db8::1` encode the same; unparsable input is only lowercased.
fn canonical_address<T: FromStr + fmt::Display>(address: &str) -> String {
    address
        .trim()
        .parse::<T>()
        .map_or_else(|_| address.trim().to_ascii_lowercase(), |a| a.to_string())
}

fn parse_number<T: FromStr>(
    token: &str,
    malformed: &dyn Fn(&str) -> ContentError,
) -> Result<T, ContentError> {
    token
        .parse()
        .map_err(|_| malformed(&format!("'{token}' is not a valid number")))
}

/// Splits off the first whitespace-delimited token, returning it and the trimmed remainder.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(idx) => Some((&s[..idx], s[idx..].trim_start())),
        None => Some((s, "")),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn encode_txt(text: &str) -> String {
    if text.is_empty() {
        return "\"\"".to_string();
    }
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(TXT_CHUNK_LEN);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(quote(chunk));
        rest = tail;
    }
    chunks.join(" ")
}

/// Concatenates all character-strings of a presentation-format value.
///
/// Accepts quoted strings (with `\"`, `\\` and `\DDD` escapes) as well as a bare unquoted value.
fn unquote_all(content: &str) -> Result<String, &'static str> {
    let content = content.trim();
    if !content.starts_with('"') {
        return Ok(content.to_string());
    }

    let mut bytes: Vec<u8> = Vec::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('"') => {}
            Some(_) => return Err("unquoted data between character-strings"),
        }
        loop {
            match chars.next() {
                None => return Err("unterminated character-string"),
                Some('"') => break,
                Some('\\') => match chars.next() {
                    None => return Err("dangling escape"),
                    Some(d) if d.is_ascii_digit() => {
                        let mut code = u32::from(d as u8 - b'0');
                        for _ in 0..2 {
                            match chars.next() {
                                Some(d) if d.is_ascii_digit() => {
                                    code = code * 10 + u32::from(d as u8 - b'0');
                                }
                                _ => return Err("invalid \\DDD escape"),
                            }
                        }
                        let byte = u8::try_from(code).map_err(|_| "invalid \\DDD escape")?;
                        bytes.push(byte);
                    }
                    Some(c) => push_char(&mut bytes, c),
                },
                Some(c) => push_char(&mut bytes, c),
            }
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Change-group key: the granularity at which differences are reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    /// Fully-qualified owner name, lowercase, without trailing dot.
    pub name_fqdn: String,
    /// Record type.
    pub record_type: RecordType,
}

impl RecordKey {
    pub fn new(name_fqdn: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name_fqdn: normalize_domain_name(&name_fqdn.into()),
            record_type,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name_fqdn, self.record_type)
    }
}

/// A single generic record: one value at one owner name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConfig {
    /// Label relative to the zone (`"@"` for the apex).
    pub name: String,
    /// Fully-qualified owner name, lowercase, without trailing dot.
    pub name_fqdn: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,
}

impl RecordConfig {
    /// Creates a record from a label that is either relative to `origin`, `"@"`, or an FQDN
    /// ending in a dot.
    pub fn new(label: &str, origin: &str, ttl: u32, data: RecordData) -> Self {
        let name_fqdn = label_to_fqdn(label, origin);
        Self {
            name: trim_domain_name(&name_fqdn, origin),
            name_fqdn,
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Fully-qualified owner name.
    pub fn label_fqdn(&self) -> &str {
        &self.name_fqdn
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.name_fqdn.clone(), self.record_type())
    }

    /// Presentation-format value used for diffing and for the wire.
    pub fn content(&self) -> String {
        self.data.to_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(record_type: RecordType, content: &str) -> RecordData {
        let res = RecordData::parse(record_type, content);
        assert!(res.is_ok(), "parse failed: {res:?}");
        let Ok(data) = res else {
            unreachable!();
        };
        data
    }

    #[test]
    fn record_type_from_str_is_case_insensitive() {
        assert_eq!("aaaa".parse::<RecordType>(), Ok(RecordType::Aaaa));
        assert_eq!("TLSA".parse::<RecordType>(), Ok(RecordType::Tlsa));
        assert_eq!(
            "OPENPGPKEY".parse::<RecordType>(),
            Err(ContentError::UnsupportedType("OPENPGPKEY".to_string()))
        );
    }

    #[test]
    fn record_type_serializes_uppercase() {
        let json = serde_json::to_string(&RecordType::Cname).unwrap();
        assert_eq!(json, "\"CNAME\"");
    }

    #[test]
    fn addresses_are_canonical() {
        let data = RecordData::AAAA {
            address: "2001:DB8:0:0::1".to_string(),
        };
        assert_eq!(data.to_content(), "2001:db8::1");
        assert_eq!(
            parse(RecordType::Aaaa, "2001:0db8::0001"),
            RecordData::AAAA {
                address: "2001:db8::1".to_string()
            }
        );
        assert_eq!(parse(RecordType::A, "192.0.2.1").to_content(), "192.0.2.1");
        assert!(RecordData::parse(RecordType::A, "192.0.2").is_err());
        assert!(RecordData::parse(RecordType::Aaaa, "2001:db8::g").is_err());
    }

    #[test]
    fn mx_content() {
        let data = parse(RecordType::Mx, "10 Mail.Example.com.");
        assert_eq!(
            data,
            RecordData::MX {
                priority: 10,
                exchange: "mail.example.com.".to_string()
            }
        );
        assert_eq!(data.to_content(), "10 mail.example.com.");
    }

    #[test]
    fn srv_content() {
        let data = parse(RecordType::Srv, "0 5 443 sip.example.com.");
        assert_eq!(data.to_content(), "0 5 443 sip.example.com.");
        assert!(RecordData::parse(RecordType::Srv, "0 5 sip.example.com.").is_err());
    }

    #[test]
    fn caa_content_keeps_quoted_value() {
        let data = parse(RecordType::Caa, "0 issue \"letsencrypt.org\"");
        assert_eq!(
            data,
            RecordData::CAA {
                flags: 0,
                tag: "issue".to_string(),
                value: "letsencrypt.org".to_string()
            }
        );
        assert_eq!(data.to_content(), "0 issue \"letsencrypt.org\"");
    }

    #[test]
    fn tlsa_content_lowercases_hex() {
        let data = parse(RecordType::Tlsa, "3 1 1 ABCDEF0123");
        assert_eq!(data.to_content(), "3 1 1 abcdef0123");
    }

    #[test]
    fn txt_quoting_and_escapes() {
        let data = RecordData::TXT {
            text: "say \"hi\" \\o/".to_string(),
        };
        let content = data.to_content();
        assert_eq!(content, "\"say \\\"hi\\\" \\\\o/\"");
        assert_eq!(parse(RecordType::Txt, &content), data);
    }

    #[test]
    fn txt_multiple_strings_are_concatenated() {
        let data = parse(RecordType::Txt, "\"v=DKIM1; k=rsa; \" \"p=MIGf\"");
        assert_eq!(
            data,
            RecordData::TXT {
                text: "v=DKIM1; k=rsa; p=MIGf".to_string()
            }
        );
    }

    #[test]
    fn txt_decimal_escape() {
        let data = parse(RecordType::Txt, "\"caf\\195\\169\"");
        assert_eq!(
            data,
            RecordData::TXT {
                text: "café".to_string()
            }
        );
    }

    #[test]
    fn txt_long_text_is_chunked() {
        let text = "x".repeat(300);
        let content = RecordData::TXT { text: text.clone() }.to_content();
        assert_eq!(content.matches('"').count(), 4);
        assert_eq!(parse(RecordType::Txt, &content), RecordData::TXT { text });
    }

    #[test]
    fn txt_empty() {
        assert_eq!(
            RecordData::TXT {
                text: String::new()
            }
            .to_content(),
            "\"\""
        );
    }

    #[test]
    fn txt_unterminated_is_rejected() {
        let res = RecordData::parse(RecordType::Txt, "\"open");
        assert!(
            matches!(&res, Err(ContentError::Malformed { .. })),
            "unexpected result: {res:?}"
        );
    }

    #[test]
    fn record_config_resolves_labels() {
        let apex = RecordConfig::new(
            "@",
            "example.com",
            300,
            RecordData::A {
                address: "1.2.3.4".into(),
            },
        );
        assert_eq!(apex.name, "@");
        assert_eq!(apex.label_fqdn(), "example.com");

        let www = RecordConfig::new(
            "WWW",
            "example.com",
            300,
            RecordData::A {
                address: "1.2.3.4".into(),
            },
        );
        assert_eq!(www.name, "www");
        assert_eq!(www.label_fqdn(), "www.example.com");

        let fqdn = RecordConfig::new(
            "mail.example.com.",
            "example.com",
            300,
            RecordData::A {
                address: "1.2.3.4".into(),
            },
        );
        assert_eq!(fqdn.name, "mail");
        assert_eq!(fqdn.key(), RecordKey::new("mail.example.com", RecordType::A));
    }

    #[test]
    fn record_key_display() {
        let key = RecordKey::new("WWW.example.com.", RecordType::Aaaa);
        assert_eq!(key.to_string(), "www.example.com:AAAA");
    }
}
