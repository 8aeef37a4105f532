//! Field extraction from UBL-family invoice XML.
//!
//! The extractor is deliberately tolerant: it matches elements by local
//! tag name only (any namespace prefix, or none), takes the first match
//! in document order for singular fields, and never fails on missing
//! data. The only error it can return is malformed XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use crate::error::DruckError;
use crate::model::{DocumentReference, InvoiceData, LineItemData};

/// Parse a UBL invoice document into an [`InvoiceData`] record.
///
/// Every field is populated best-effort; an absent element leaves its
/// slot `None`. Repeated structures (`InvoiceLine`,
/// `AdditionalDocumentReference`) are collected in document order, each
/// with lookups scoped to its own subtree so sibling values never bleed
/// across items.
pub fn from_ubl_xml(xml: &str) -> Result<InvoiceData, DruckError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = Extractor::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.name());
                state.handle_start(&path, &name, e);
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing elements still open/close groups and can
                // carry attributes (e.g. <InvoicedQuantity unitCode=".."/>).
                let name = local_name(e.name());
                state.handle_start(&path, &name, e);
                state.handle_end(&name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if !text.is_empty() {
                    state.handle_text(&path, &text);
                }
            }
            Ok(Event::End(_)) => {
                let ended = path.pop().unwrap_or_default();
                state.handle_end(&ended);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DruckError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok(state.data)
}

/// Strip any namespace prefix from a qualified name.
fn local_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        (a.key.as_ref() == key.as_bytes())
            .then(|| String::from_utf8_lossy(&a.value).into_owned())
    })
}

/// First match wins: assign only while the slot is still empty.
fn set(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

#[derive(Default)]
struct Extractor {
    data: InvoiceData,
    current_line: Option<LineItemData>,
    current_doc: Option<DocumentReference>,
}

impl Extractor {
    fn handle_start(&mut self, path: &[String], name: &str, e: &BytesStart<'_>) {
        let has = |n: &str| path.iter().any(|p| p == n);
        match name {
            "InvoiceLine" => self.current_line = Some(LineItemData::default()),
            "AdditionalDocumentReference" => {
                self.current_doc = Some(DocumentReference::default());
            }
            "InvoicedQuantity" => {
                if let Some(line) = self.current_line.as_mut() {
                    if let Some(unit) = attr(e, "unitCode") {
                        set(&mut line.quantity_unit, &unit);
                    }
                }
            }
            // Attribute capture carries the same Price scope as the
            // matching text capture below.
            "BaseQuantity" if has("Price") => {
                if let Some(line) = self.current_line.as_mut() {
                    if let Some(unit) = attr(e, "unitCode") {
                        set(&mut line.base_quantity_unit, &unit);
                    }
                }
            }
            "PriceAmount" if has("Price") => {
                if let Some(line) = self.current_line.as_mut() {
                    if let Some(currency) = attr(e, "currencyID") {
                        set(&mut line.price_currency, &currency);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &str) {
        match name {
            "InvoiceLine" => {
                if let Some(line) = self.current_line.take() {
                    self.data.items.push(line);
                }
            }
            "AdditionalDocumentReference" => {
                // Only keep references that carried at least one field.
                if let Some(doc) = self.current_doc.take() {
                    if doc.id.is_some() || doc.description.is_some() {
                        self.data.additional_documents.push(doc);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, path: &[String], text: &str) {
        let leaf = path.last().map(String::as_str).unwrap_or("");
        let has = |n: &str| path.iter().any(|p| p == n);
        let d = &mut self.data;

        // Document-level singular fields carry no context guard: the
        // first element of that local name anywhere in the document
        // wins, exactly like a wildcard-namespace descendant search.
        match leaf {
            "ID" => set(&mut d.invoice_id, text),
            "IssueDate" => set(&mut d.issue_date, text),
            "DueDate" => set(&mut d.due_date, text),
            "InvoiceTypeCode" => set(&mut d.invoice_type_code, text),
            "Note" => set(&mut d.note, text.trim()),
            "DocumentCurrencyCode" => set(&mut d.currency, text),
            "BuyerReference" => set(&mut d.buyer_reference, text),
            "ProfileID" => set(&mut d.profile_id, text),
            "CustomizationID" => set(&mut d.customization_id, text),
            "StartDate" if has("InvoicePeriod") => set(&mut d.period_start, text),
            "EndDate" if has("InvoicePeriod") => set(&mut d.period_end, text),
            _ => {}
        }

        // Seller
        if has("AccountingSupplierParty") && has("Party") {
            let sup = &mut d.supplier;
            match leaf {
                "EndpointID" => set(&mut sup.endpoint_id, text),
                "Name" if has("PartyName") => set(&mut sup.name, text),
                "StreetName" if has("PostalAddress") => set(&mut sup.street, text),
                "CityName" if has("PostalAddress") => set(&mut sup.city, text),
                "PostalZone" if has("PostalAddress") => set(&mut sup.postal_zone, text),
                "IdentificationCode" if has("PostalAddress") && has("Country") => {
                    set(&mut sup.country_code, text)
                }
                "CompanyID" if has("PartyTaxScheme") => set(&mut sup.company_id, text),
                "RegistrationName" if has("PartyLegalEntity") => {
                    set(&mut sup.registration_name, text)
                }
                "Name" if has("Contact") => set(&mut sup.contact.name, text),
                "Telephone" if has("Contact") => set(&mut sup.contact.telephone, text),
                "ElectronicMail" if has("Contact") => set(&mut sup.contact.email, text),
                _ => {}
            }
        }

        // Buyer
        if has("AccountingCustomerParty") && has("Party") {
            let cust = &mut d.customer;
            match leaf {
                "EndpointID" => set(&mut cust.endpoint_id, text),
                "Name" if has("PartyName") => set(&mut cust.name, text),
                "StreetName" if has("PostalAddress") => set(&mut cust.street, text),
                "CityName" if has("PostalAddress") => set(&mut cust.city, text),
                "PostalZone" if has("PostalAddress") => set(&mut cust.postal_zone, text),
                "IdentificationCode" if has("PostalAddress") && has("Country") => {
                    set(&mut cust.country_code, text)
                }
                "RegistrationName" if has("PartyLegalEntity") => {
                    set(&mut cust.registration_name, text)
                }
                _ => {}
            }
        }

        // Payment means
        if has("PaymentMeans") {
            let pay = &mut d.payment_means;
            match leaf {
                "PaymentMeansCode" => set(&mut pay.means_code, text),
                "PaymentID" => set(&mut pay.payment_id, text),
                _ => {}
            }
            if has("PayeeFinancialAccount") {
                match leaf {
                    // An ID inside the institution branch is the BIC,
                    // any other ID in the account is the IBAN.
                    "ID" if has("FinancialInstitutionBranch") => {
                        set(&mut pay.account.bic, text)
                    }
                    "ID" => set(&mut pay.account.id, text),
                    "Name" => set(&mut pay.account.name, text),
                    _ => {}
                }
            }
        }

        // Tax total — a single subtotal/category is carried.
        if has("TaxTotal") {
            if leaf == "TaxAmount" {
                set(&mut d.tax_total.tax_amount, text);
            }
            if has("TaxSubtotal") {
                let sub = &mut d.tax_total.subtotal;
                match leaf {
                    "TaxableAmount" => set(&mut sub.taxable_amount, text),
                    "TaxAmount" => set(&mut sub.tax_amount, text),
                    "ID" if has("TaxCategory") && has("TaxScheme") => {
                        set(&mut sub.category.scheme_id, text)
                    }
                    "ID" if has("TaxCategory") => set(&mut sub.category.id, text),
                    "Percent" if has("TaxCategory") => set(&mut sub.category.percent, text),
                    _ => {}
                }
            }
        }

        // Document totals
        if has("LegalMonetaryTotal") {
            let mt = &mut d.monetary_total;
            match leaf {
                "LineExtensionAmount" => set(&mut mt.line_extension_amount, text),
                "TaxExclusiveAmount" => set(&mut mt.tax_exclusive_amount, text),
                "TaxInclusiveAmount" => set(&mut mt.tax_inclusive_amount, text),
                "AllowanceTotalAmount" => set(&mut mt.allowance_total_amount, text),
                "ChargeTotalAmount" => set(&mut mt.charge_total_amount, text),
                "PayableAmount" => set(&mut mt.payable_amount, text),
                _ => {}
            }
        }

        // Current invoice line — lookups are scoped to the open record,
        // never the whole document.
        if let Some(line) = self.current_line.as_mut() {
            if leaf == "ID" {
                if has("ClassifiedTaxCategory") {
                    if has("TaxScheme") {
                        set(&mut line.tax_category.scheme_id, text);
                    } else {
                        set(&mut line.tax_category.id, text);
                    }
                }
                // The first ID in the line subtree is the line number.
                set(&mut line.id, text);
            }
            match leaf {
                "InvoicedQuantity" => set(&mut line.quantity, text),
                "LineExtensionAmount" => set(&mut line.line_extension_amount, text),
                "Name" if has("Item") => set(&mut line.item_name, text),
                "Percent" if has("ClassifiedTaxCategory") => {
                    set(&mut line.tax_category.percent, text)
                }
                "PriceAmount" if has("Price") => set(&mut line.price_amount, text),
                "BaseQuantity" if has("Price") => set(&mut line.base_quantity, text),
                _ => {}
            }
        }

        // Current additional document reference
        if let Some(doc) = self.current_doc.as_mut() {
            match leaf {
                "ID" => set(&mut doc.id, text),
                "DocumentDescription" => set(&mut doc.description, text),
                _ => {}
            }
        }
    }
}
