//! Pairing per-document results into spreadsheet rows.
//!
//! Both strategies are pure functions over already extracted documents.

use crate::models::document::{PackageSource, PairedRow, Row};

use super::ExtractedDocument;

/// Zip sorted invoices and attachments by position.
///
/// Produces `max(invoices, attachments)` rows. VAT number and weight come
/// from the attachment, the package number from the invoice, falling back to
/// the attachment at the same position when the invoice has none.
pub fn pair_positional(
    invoices: &[ExtractedDocument],
    attachments: &[ExtractedDocument],
) -> Vec<PairedRow> {
    let len = invoices.len().max(attachments.len());

    (0..len)
        .map(|idx| {
            let invoice = invoices.get(idx);
            let attachment = attachments.get(idx);

            let invoice_package = invoice.and_then(|i| i.result.fields.package_number.clone());
            let (package, package_source) = match invoice_package {
                Some(p) => (Some(p), Some(PackageSource::Invoice)),
                None => match attachment.and_then(|a| a.result.fields.package_number.clone()) {
                    Some(p) => (Some(p), Some(PackageSource::AttachmentFallback)),
                    None => (None, None),
                },
            };

            let attachment_fields = attachment.map(|a| &a.result.fields);

            PairedRow {
                row: Row {
                    fv: attachment_fields.and_then(|f| f.vat_number.clone()),
                    weight: attachment_fields.and_then(|f| f.weight.clone()),
                    package,
                },
                invoice: invoice.map(|i| i.document.file_name.clone()),
                attachment: attachment.map(|a| a.document.file_name.clone()),
                package_source,
            }
        })
        .collect()
}

/// One row per attachment, every field read from the attachment itself.
pub fn pair_attachments_only(attachments: &[ExtractedDocument]) -> Vec<PairedRow> {
    attachments
        .iter()
        .map(|a| {
            let fields = &a.result.fields;
            PairedRow {
                row: Row {
                    fv: fields.vat_number.clone(),
                    weight: fields.weight.clone(),
                    package: fields.package_number.clone(),
                },
                invoice: None,
                attachment: Some(a.document.file_name.clone()),
                package_source: fields.package_number.as_ref().map(|_| PackageSource::Attachment),
            }
        })
        .collect()
}
