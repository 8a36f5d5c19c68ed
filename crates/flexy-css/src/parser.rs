//! CSS Parser using lightningcss
//!
//! Walks the lightningcss rule list and keeps the style rules whose
//! selectors the DOM can match. At-rules (`@media`, `@font-face`, ...) do not
//! take part in matching. Shorthand declarations are stored as their
//! longhands, so `border: 1px solid red` answers `border-top-color`.

use flexy_dom::{CssStyleDeclaration, SelectorList};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::{Property, PropertyId};
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use lightningcss::vendor_prefix::VendorPrefix;

use crate::{CssError, CssResult};

/// Canonical, readable form of a stylesheet
pub fn normalize(css: &str) -> CssResult<String> {
    print(css, false)
}

/// Minified form of a stylesheet
pub fn minify(css: &str) -> CssResult<String> {
    print(css, true)
}

fn print(css: &str, minify: bool) -> CssResult<String> {
    let sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| CssError::Parse(e.to_string()))?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify,
            ..PrinterOptions::default()
        })
        .map_err(|e| CssError::Print(e.to_string()))?;
    Ok(printed.code)
}

/// A parsed stylesheet
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A style rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector_text: String,
    pub selectors: SelectorList,
    pub declarations: CssStyleDeclaration,
}

/// CSS Parser
#[derive(Debug, Default, Clone, Copy)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a stylesheet
    pub fn parse(&self, css: &str) -> CssResult<Stylesheet> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| CssError::Parse(e.to_string()))?;

        let mut sheet = Stylesheet::new();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                sheet.rules.push(converted);
            }
        }

        tracing::debug!("parsed {} style rules", sheet.len());
        Ok(sheet)
    }

    /// Parse a declaration list such as a `style` attribute. Declarations
    /// lightningcss rejects are dropped.
    pub fn parse_declarations(&self, css: &str) -> CssResult<CssStyleDeclaration> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let block = DeclarationBlock::parse_string(css, options)
            .map_err(|e| CssError::Parse(e.to_string()))?;
        Ok(self.convert_declarations(&block))
    }

    fn convert_rule(&self, rule: &CssRule<'_>) -> Option<Rule> {
        let CssRule::Style(style_rule) = rule else {
            tracing::trace!("skipping non-style rule");
            return None;
        };

        let selector_text = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
            Ok(text) => text,
            Err(e) => {
                tracing::trace!("selector not printable: {e}");
                return None;
            }
        };
        let Some(selectors) = SelectorList::parse(&selector_text) else {
            tracing::trace!("selector not matchable: {selector_text}");
            return None;
        };

        Some(Rule {
            selector_text,
            selectors,
            declarations: self.convert_declarations(&style_rule.declarations),
        })
    }

    fn convert_declarations(&self, block: &DeclarationBlock<'_>) -> CssStyleDeclaration {
        let mut result = CssStyleDeclaration::new();
        for property in &block.declarations {
            self.convert_declaration(property, false, &mut result);
        }
        for property in &block.important_declarations {
            self.convert_declaration(property, true, &mut result);
        }
        result
    }

    fn convert_declaration(
        &self,
        property: &Property<'_>,
        important: bool,
        out: &mut CssStyleDeclaration,
    ) {
        let id = property.property_id();

        // `var()` shorthands come back unparsed and have no longhands
        let longhands: Vec<Property<'_>> = id
            .longhands()
            .unwrap_or_default()
            .iter()
            .filter_map(|longhand| property.longhand(longhand))
            .collect();
        if !longhands.is_empty() {
            for longhand in &longhands {
                self.convert_declaration(longhand, important, out);
            }
            return;
        }

        match property.value_to_css_string(PrinterOptions::default()) {
            Ok(value) => out.set_property_with_priority(&property_name(&id), &value, important),
            Err(e) => tracing::trace!("{} not printable: {e}", id.name()),
        }
    }
}

/// Property name including its vendor prefix
fn property_name(id: &PropertyId<'_>) -> String {
    let prefix = id.prefix();
    let vendor = [
        (VendorPrefix::WebKit, "-webkit-"),
        (VendorPrefix::Moz, "-moz-"),
        (VendorPrefix::Ms, "-ms-"),
        (VendorPrefix::O, "-o-"),
    ]
    .into_iter()
    .find(|(p, _)| prefix.contains(*p))
    .map_or("", |(_, s)| s);
    format!("{vendor}{}", id.name())
}
