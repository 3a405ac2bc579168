//! DYMO Web Service Client
//!
//! DYMO Label Software exposes a local HTTPS endpoint for printer discovery,
//! label rasterization, and print submission. Bodies arrive as JSON-encoded
//! strings on current builds (the printer listing is XML inside that
//! string); older builds return the payload bare.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 41951;

#[derive(Debug, Error)]
pub enum DymoError {
    #[error("Label service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed printer listing: {0}")]
    Listing(String),

    #[error("Invalid rendered label payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// The device collaborator surface consumed by the pipeline.
#[async_trait]
pub trait LabelService {
    /// Name of the first discovered label printer, if any.
    async fn first_printer(&self) -> Result<Option<String>, DymoError>;

    /// Rasterize a label document to PNG bytes without printing it.
    async fn render_label(&self, label_xml: &str) -> Result<Vec<u8>, DymoError>;

    /// Submit a label document to a named printer.
    async fn print_label(&self, printer: &str, label_xml: &str) -> Result<(), DymoError>;
}

/// Client for the DYMO Label Software web service.
pub struct DymoWebService {
    base_url: String,
    client: reqwest::Client,
}

impl DymoWebService {
    pub fn new(host: &str, port: u16) -> Result<Self, DymoError> {
        // The service presents a self-signed certificate for localhost.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            base_url: format!("https://{host}:{port}/DYMO/DLS/Printing"),
            client,
        })
    }

    /// All discovered LabelWriter printers, in listing order.
    pub async fn list_printers(&self) -> Result<Vec<String>, DymoError> {
        let response = self
            .client
            .get(format!("{}/GetPrinters", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        parse_printer_names(&unquote(&body))
    }
}

#[async_trait]
impl LabelService for DymoWebService {
    async fn first_printer(&self) -> Result<Option<String>, DymoError> {
        Ok(self.list_printers().await?.into_iter().next())
    }

    async fn render_label(&self, label_xml: &str) -> Result<Vec<u8>, DymoError> {
        let response = self
            .client
            .post(format!("{}/RenderLabel", self.base_url))
            .form(&[
                ("printerName", ""),
                ("renderParamsXml", ""),
                ("labelXml", label_xml),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let payload = unquote(&body);
        let bytes = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            payload.trim(),
        )?;
        Ok(bytes)
    }

    async fn print_label(&self, printer: &str, label_xml: &str) -> Result<(), DymoError> {
        self.client
            .post(format!("{}/PrintLabel", self.base_url))
            .form(&[
                ("printerName", printer),
                ("printParamsXml", ""),
                ("labelXml", label_xml),
                ("labelSetXml", ""),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Unwrap a JSON-encoded string body; bare bodies pass through unchanged.
fn unquote(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string())
}

/// Printer names from a GetPrinters listing, in listing order.
///
/// Only LabelWriter entries are considered; tape printers cannot take the
/// die-cut labels this pipeline produces.
pub fn parse_printer_names(xml: &str) -> Result<Vec<String>, DymoError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut names = Vec::new();
    let mut in_printer = false;
    let mut in_name = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"LabelWriterPrinter" => in_printer = true,
                b"Name" if in_printer => in_name = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"LabelWriterPrinter" => in_printer = false,
                b"Name" => in_name = false,
                _ => {}
            },
            Ok(Event::Text(text)) if in_name => {
                let name = text
                    .unescape()
                    .map_err(|e| DymoError::Listing(e.to_string()))?;
                names.push(name.into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DymoError::Listing(e.to_string())),
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Printers>
    <LabelWriterPrinter>
        <Name>DYMO LabelWriter 450</Name>
        <ModelName>DYMO LabelWriter 450</ModelName>
        <IsConnected>True</IsConnected>
    </LabelWriterPrinter>
    <LabelWriterPrinter>
        <Name>DYMO LabelWriter 550 Turbo</Name>
        <ModelName>DYMO LabelWriter 550 Turbo</ModelName>
        <IsConnected>False</IsConnected>
    </LabelWriterPrinter>
</Printers>"#;

    #[test]
    fn parses_printer_names_in_listing_order() {
        let names = parse_printer_names(LISTING).unwrap();
        assert_eq!(
            names,
            vec!["DYMO LabelWriter 450", "DYMO LabelWriter 550 Turbo"]
        );
    }

    #[test]
    fn empty_listing_yields_no_names() {
        let names = parse_printer_names("<Printers></Printers>").unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn tape_printers_are_ignored() {
        let xml = "<Printers><TapePrinter><Name>DYMO LabelManager</Name></TapePrinter></Printers>";
        let names = parse_printer_names(xml).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn unquote_unwraps_json_encoded_bodies() {
        assert_eq!(unquote(r#""<Printers />""#), "<Printers />");
        assert_eq!(unquote("<Printers />"), "<Printers />");
    }
}
