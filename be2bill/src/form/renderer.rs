//! HTML rendering of signed forms.

use std::collections::BTreeMap;

use html_escape::encode_double_quoted_attribute_to_string;
use tracing::warn;

use crate::{
    constants::html_option,
    environment::join_path,
    params::{Params, Value},
};

/// Path of the hosted payment page.
pub const FORM_PATH: &str = "/front/form/process";

/// Encodes a signed parameter map for embedding in a merchant page.
pub trait Renderer: Send + Sync {
    /// Renders `params` with the presentation attributes of `options`.
    fn render(&self, params: &Params, options: &HtmlOptions) -> String;
}

/// Extra HTML attributes of the `<form>` element and its submit button.
///
/// # Examples
///
/// ```
/// use be2bill::form::HtmlOptions;
///
/// let options = HtmlOptions::new()
///     .with_form_attribute("id", "myform")
///     .with_submit_attribute("value", "Pay with be2bill")
///     .with_submit_attribute("class", "flatButton");
///
/// assert_eq!(options.form.get("id").map(String::as_str), Some("myform"));
/// assert_eq!(options.submit.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Attributes of the `<form>` element.
    pub form: BTreeMap<String, String>,
    /// Attributes of the submit `<input>`.
    pub submit: BTreeMap<String, String>,
}

impl HtmlOptions {
    /// Creates options without extra attributes.
    #[must_use]
    pub const fn new() -> Self {
        Self { form: BTreeMap::new(), submit: BTreeMap::new() }
    }

    /// Adds a `<form>` attribute.
    #[must_use]
    pub fn with_form_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    /// Adds a submit button attribute.
    #[must_use]
    pub fn with_submit_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.submit.insert(name.into(), value.into());
        self
    }

    /// Reads options from a parameter map holding `FORM` and `SUBMIT` nested
    /// maps, the layout used by other be2bill SDKs.
    ///
    /// Nested maps below the attribute level are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::{form::HtmlOptions, params::Params};
    ///
    /// let raw = Params::new().with("FORM", Params::new().with("id", "myform"));
    /// let options = HtmlOptions::from_params(&raw);
    /// assert_eq!(options.form.get("id").map(String::as_str), Some("myform"));
    /// assert!(options.submit.is_empty());
    /// ```
    #[must_use]
    pub fn from_params(params: &Params) -> Self {
        Self {
            form: attributes(params.get(html_option::FORM)),
            submit: attributes(params.get(html_option::SUBMIT)),
        }
    }
}

fn attributes(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_nested)
        .map(|nested| {
            nested
                .iter()
                .filter_map(|(name, value)| Some((name.clone(), value.as_scalar()?.into_owned())))
                .collect()
        })
        .unwrap_or_default()
}

/// Renders a `<form>` posting to the hosted payment page.
///
/// Hidden inputs carry the flattened parameters sorted by name, one per
/// line. Attribute values are escaped; attribute names that are not valid
/// HTML attribute names are dropped.
///
/// # Examples
///
/// ```
/// use be2bill::{
///     form::{HtmlOptions, HtmlRenderer, Renderer},
///     params::Params,
/// };
///
/// let renderer = HtmlRenderer::new("https://secure-test.be2bill.com");
/// let html = renderer.render(&Params::new().with("ORDERID", "42"), &HtmlOptions::new());
///
/// assert_eq!(
///     html,
///     "<form method=\"post\" action=\"https://secure-test.be2bill.com/front/form/process\">\n  \
///      <input type=\"hidden\" name=\"ORDERID\" value=\"42\" />\n  \
///      <input type=\"submit\" />\n\
///      </form>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderer {
    action: String,
}

impl HtmlRenderer {
    /// Creates a renderer posting to the form page of `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { action: join_path(base_url, FORM_PATH) }
    }

    /// URL the rendered forms post to.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, params: &Params, options: &HtmlOptions) -> String {
        let mut html = String::from("<form method=\"post\" action=\"");
        encode_double_quoted_attribute_to_string(&self.action, &mut html);
        html.push('"');
        push_attributes(&mut html, &options.form);
        html.push('>');

        for (name, value) in params.flatten() {
            html.push_str("\n  <input type=\"hidden\" name=\"");
            encode_double_quoted_attribute_to_string(&name, &mut html);
            html.push_str("\" value=\"");
            encode_double_quoted_attribute_to_string(&value, &mut html);
            html.push_str("\" />");
        }

        html.push_str("\n  <input type=\"submit\"");
        push_attributes(&mut html, &options.submit);
        html.push_str(" />\n</form>");
        html
    }
}

fn push_attributes(html: &mut String, attributes: &BTreeMap<String, String>) {
    for (name, value) in attributes {
        if !is_valid_attribute_name(name) {
            warn!(attribute = %name, "dropping invalid HTML attribute name");
            continue;
        }
        html.push(' ');
        html.push_str(name);
        html.push_str("=\"");
        encode_double_quoted_attribute_to_string(value, html);
        html.push('"');
    }
}

/// Attribute names are non-empty and free of whitespace, quotes, `>`, `/`,
/// `=` and control characters.
fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '>' | '<' | '/' | '=' | '&')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> HtmlRenderer {
        HtmlRenderer::new("https://secure-test.be2bill.com")
    }

    #[test]
    fn test_action_url() {
        assert_eq!(renderer().action(), "https://secure-test.be2bill.com/front/form/process");
        assert_eq!(
            HtmlRenderer::new("https://secure-test.be2bill.com/").action(),
            "https://secure-test.be2bill.com/front/form/process"
        );
    }

    #[test]
    fn test_render_with_attributes() {
        let params = Params::new().with("B", "2").with("A", "1");
        let options = HtmlOptions::new()
            .with_form_attribute("id", "myform")
            .with_submit_attribute("value", "Pay")
            .with_submit_attribute("class", "flatButton");

        let expected = concat!(
            "<form method=\"post\" action=\"https://secure-test.be2bill.com/front/form/process\" id=\"myform\">\n",
            "  <input type=\"hidden\" name=\"A\" value=\"1\" />\n",
            "  <input type=\"hidden\" name=\"B\" value=\"2\" />\n",
            "  <input type=\"submit\" class=\"flatButton\" value=\"Pay\" />\n",
            "</form>",
        );
        assert_eq!(renderer().render(&params, &options), expected);
    }

    #[test]
    fn test_render_flattens_nested_params() {
        let params = Params::new().with("AMOUNTS", Params::new().with("2012-06-04", 2).with("2010-05-14", 1));
        let html = renderer().render(&params, &HtmlOptions::new());

        let first = html.find("AMOUNTS[2010-05-14]").unwrap();
        let second = html.find("AMOUNTS[2012-06-04]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_escapes_values() {
        let params = Params::new().with("DESCRIPTION", "\"><script>alert(1)</script>");
        let options = HtmlOptions::new().with_submit_attribute("value", "Pay \"now\"");
        let html = renderer().render(&params, &options);

        assert!(!html.contains("\"><script>"));
        assert!(html.contains("&quot;"));
        assert!(!html.contains("\"now\""));
    }

    #[test]
    fn test_render_drops_invalid_attribute_names() {
        let options = HtmlOptions::new()
            .with_form_attribute("onsubmit=\"evil()\" x", "1")
            .with_form_attribute("", "empty")
            .with_form_attribute("data-id", "7");
        let html = renderer().render(&Params::new(), &options);

        assert!(html.starts_with(
            "<form method=\"post\" action=\"https://secure-test.be2bill.com/front/form/process\" data-id=\"7\">"
        ));
        assert!(!html.contains("evil"));
    }

    #[test]
    fn test_valid_attribute_names() {
        assert!(is_valid_attribute_name("class"));
        assert!(is_valid_attribute_name("data-foo_bar"));
        assert!(is_valid_attribute_name("aria-label"));
        assert!(!is_valid_attribute_name("a b"));
        assert!(!is_valid_attribute_name("a/b"));
        assert!(!is_valid_attribute_name("a\u{0}"));
    }

    #[test]
    fn test_options_from_params() {
        let raw = Params::new()
            .with("SUBMIT", Params::new().with("value", "Pay").with("tabindex", 3))
            .with("FORM", "not a map");
        let options = HtmlOptions::from_params(&raw);

        assert!(options.form.is_empty());
        assert_eq!(options.submit.get("value").map(String::as_str), Some("Pay"));
        assert_eq!(options.submit.get("tabindex").map(String::as_str), Some("3"));
    }
}
