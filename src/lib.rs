//! Scale, flip, rotate and normalize QElectroTech element files (`.elmt`),
//! or render them to SVG.
//!
//! ```
//! use elmt_scaler::{TransformConfig, transform_document};
//!
//! let source = r#"<definition width="10" height="10" hotspot_x="5" hotspot_y="5">
//!     <description><rect x="-5" y="-5" width="10" height="10"/></description>
//! </definition>"#;
//! let conversion = transform_document(source, "relay.elmt", &TransformConfig::scaled(2.0))?;
//! assert!(conversion.output.contains(r#"<rect x="-10" y="-10" width="20" height="20""#));
//! # Ok::<(), elmt_scaler::Error>(())
//! ```

pub mod config;
pub mod definition;
pub mod errors;
pub mod format;
pub mod geometry;
pub mod identity;
mod log;
pub mod metadata;
pub mod pipeline;
pub mod primitives;
pub mod style;
pub mod svg;
pub mod tree;

pub use config::{TransformConfig, parse_factor};
pub use errors::{ConfigError, DocumentError, Error, PartError};
pub use pipeline::{DroppedPart, ProcessReport, Processed, ProcessedElement};

/// A converted document and what was repaired along the way
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub output: String,
    pub report: ProcessReport,
}

fn load(source: &str, name: &str, config: &TransformConfig) -> Result<tree::Element, Error> {
    config.validate()?;
    Ok(tree::parse_document(source, name)?)
}

/// Transform an element or directory document and write it back as XML.
///
/// `name` labels the source in error reports.
pub fn transform_document(
    source: &str,
    name: &str,
    config: &TransformConfig,
) -> Result<Conversion, Error> {
    let mut root = load(source, name, config)?;
    let report = match pipeline::process_document(&mut root, config)? {
        Processed::Element(element) => element.report,
        Processed::Directory => ProcessReport::default(),
    };
    Ok(Conversion {
        output: tree::write_document(&root)?,
        report,
    })
}

/// Transform an element document and render the result as SVG
pub fn element_to_svg(
    source: &str,
    name: &str,
    config: &TransformConfig,
) -> Result<Conversion, Error> {
    let mut root = load(source, name, config)?;
    match pipeline::process_document(&mut root, config)? {
        Processed::Element(element) => Ok(Conversion {
            output: svg::to_svg_string(&element, config.decimals)?,
            report: element.report,
        }),
        Processed::Directory => Err(DocumentError::UnsupportedRoot {
            tag: root.name.clone(),
        }
        .into()),
    }
}
