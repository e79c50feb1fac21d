//! URL values and URI templates backing every HREF in a publication.
//!
//! HREFs found in manifests range from strictly valid URIs to legacy
//! filesystem-style paths with unencoded spaces. [`Url::from_href`] accepts
//! both: strict input is parsed as-is, anything else is percent-encoded and
//! treated as a relative path.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Characters escaped when rescuing a legacy path into a valid URI path.
///
/// `%`, `?` and `#` are included: a legacy path carries no query, fragment or
/// percent-escapes, so those characters are data.
const LEGACY_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Characters escaped when expanding a URI template variable value.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A parsed URI reference: absolute URL, rooted path or relative path.
///
/// # Examples
/// ```
/// use webpub::href::Url;
///
/// let base = Url::from_href("https://example.com/book/manifest.json");
/// let chapter = base.resolve(&Url::from_href("chapter1.xhtml"));
///
/// assert_eq!("https://example.com/book/chapter1.xhtml", chapter.to_string());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Url {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Url {
    /// Parses a strictly valid, percent-encoded URI reference.
    ///
    /// Returns `None` when `input` contains characters not allowed in a URI
    /// or malformed percent-escapes.
    pub fn parse(input: &str) -> Option<Self> {
        is_valid_uri(input).then(|| Self::split(input))
    }

    /// Parses any HREF, falling back to legacy filesystem-path handling when
    /// `input` is not a strictly valid URI.
    pub fn from_href(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| Self {
            scheme: None,
            authority: None,
            path: utf8_percent_encode(input, LEGACY_PATH).to_string(),
            query: None,
            fragment: None,
        })
    }

    /// Splits an already-validated URI reference into its components.
    fn split(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_owned())),
            None => (input, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_owned())),
            None => (rest, None),
        };

        let (scheme, rest) = match rest.split_once(':') {
            Some((scheme, after)) if is_valid_scheme(scheme) => {
                (Some(scheme.to_ascii_lowercase()), after)
            }
            _ => (None, rest),
        };

        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                (Some(after[..end].to_owned()), after[end..].to_owned())
            }
            None => (None, rest.to_owned()),
        };

        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }

    /// The scheme, lowercased, when the reference is absolute.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Whether this reference carries a scheme (e.g., `https:`).
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Collapses `.`/`..` path segments.
    ///
    /// Idempotent; excess `..` segments that would escape the root (or the
    /// start of a relative path) are dropped.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.path = remove_dot_segments(&self.path);
        normalized
    }

    /// Resolves `reference` against this base URL, per RFC 3986 §5.3.
    ///
    /// An absolute reference wins outright; a rooted path keeps the base's
    /// scheme and authority; anything else is joined against the base's
    /// parent directory.
    pub fn resolve(&self, reference: &Url) -> Url {
        if reference.scheme.is_some() {
            return reference.normalized();
        }

        let mut target = reference.clone();
        target.scheme = self.scheme.clone();

        if reference.authority.is_some() {
            return target.normalized();
        }
        target.authority = self.authority.clone();

        if reference.path.is_empty() {
            target.path = self.path.clone();
            if reference.query.is_none() {
                target.query = self.query.clone();
            }
            return target;
        }
        if !reference.path.starts_with('/') {
            target.path = self.merge_path(&reference.path);
        }
        target.normalized()
    }

    /// Joins a relative path against this URL's parent directory.
    fn merge_path(&self, relative: &str) -> String {
        if self.authority.is_some() && self.path.is_empty() {
            return format!("/{relative}");
        }
        match self.path.rfind('/') {
            Some(index) => format!("{}{relative}", &self.path[..=index]),
            None => relative.to_owned(),
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        write!(f, "{}", self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_valid_uri(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let valid = bytes.len() > index + 2
                    && bytes[index + 1].is_ascii_hexdigit()
                    && bytes[index + 2].is_ascii_hexdigit();
                if !valid {
                    return false;
                }
                index += 3;
            }
            byte if byte.is_ascii_alphanumeric() => index += 1,
            b'-' | b'.' | b'_' | b'~' | b':' | b'/' | b'?' | b'#' | b'[' | b']' | b'@' | b'!'
            | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=' => index += 1,
            _ => return false,
        }
    }
    true
}

fn remove_dot_segments(path: &str) -> String {
    let rooted = path.starts_with('/');
    let directory = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    let mut stack: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // No segment must come before the root when present.
                stack.pop();
            }
            segment => stack.push(segment),
        }
    }

    let mut normalized = String::with_capacity(path.len());
    if rooted {
        normalized.push('/');
    }
    normalized.push_str(&stack.join("/"));
    if directory && !stack.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// An RFC 6570 URI template, limited to the expansion forms found in
/// publication manifests: simple `{var}` plus the form-style `{?a,b}` and
/// continuation `{&a,b}` operators.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use webpub::href::UriTemplate;
///
/// let template = UriTemplate::new("/search{?query,page}");
/// let parameters = BTreeMap::from([("query".to_owned(), "dune".to_owned())]);
///
/// assert_eq!("/search?query=dune", template.expand(&parameters));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UriTemplate(String);

impl UriTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The variable names declared by the template, in lexical order.
    pub fn parameters(&self) -> BTreeSet<String> {
        let mut parameters = BTreeSet::new();
        for_each_expression(&self.0, &mut |_, variables, _| {
            parameters.extend(variables.iter().map(|v| (*v).to_owned()));
        });
        parameters
    }

    /// Expands the template with the given parameters.
    ///
    /// Variables without a matching parameter are removed, not left literal.
    pub fn expand(&self, parameters: &BTreeMap<String, String>) -> String {
        let mut expanded = String::with_capacity(self.0.len());
        for_each_expression(&self.0, &mut |operator, variables, output| {
            let resolved: Vec<(&str, String)> = variables
                .iter()
                .filter_map(|name| {
                    parameters
                        .get(*name)
                        .map(|value| (*name, utf8_percent_encode(value, COMPONENT).to_string()))
                })
                .collect();

            match operator {
                Some(prefix @ ('?' | '&')) => {
                    for (index, (name, value)) in resolved.iter().enumerate() {
                        output.push(if index == 0 { prefix } else { '&' });
                        output.push_str(name);
                        output.push('=');
                        output.push_str(value);
                    }
                }
                _ => {
                    let values: Vec<&str> =
                        resolved.iter().map(|(_, value)| value.as_str()).collect();
                    output.push_str(&values.join(","));
                }
            }
            expanded.push_str(output);
        });
        expanded
    }
}

impl Display for UriTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drives a callback over each `{...}` expression, passing literal text
/// through untouched. The callback receives the operator (if any), the
/// variable names, and a buffer holding the literal prefix to append to.
fn for_each_expression(template: &str, callback: &mut dyn FnMut(Option<char>, &[&str], &mut String)) {
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let mut literal = rest[..open].to_owned();
        let expression = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let (operator, variables) = match expression.chars().next() {
            Some(operator @ ('?' | '&' | '#' | '+' | '/' | '.' | ';')) => {
                (Some(operator), &expression[operator.len_utf8()..])
            }
            _ => (None, expression),
        };
        let names: Vec<&str> = variables
            .split(',')
            .map(|name| {
                // Strip value modifiers (`:3`, `*`).
                name.find([':', '*']).map_or(name, |end| &name[..end])
            })
            .filter(|name| !name.is_empty())
            .collect();

        callback(operator, &names, &mut literal);
    }

    if !rest.is_empty() {
        let mut tail = rest.to_owned();
        callback(None, &[], &mut tail);
    }
}
