//! Summary PDF renderer and pagination engine.
//!
//! Produces the fixed three-logical-page German "Lesefassung" of an
//! invoice: overview, payment/details, contract/attachments. Content is
//! laid out top-to-bottom with an explicit vertical cursor; when the
//! line-item or attachment loops run out of room an additional physical
//! page is opened that repeats the header of the same logical page. The
//! page label therefore always reads "Seite X / 3" even when a logical
//! page spans several physical ones.
//!
//! Drawing uses the printpdf ops API with builtin Helvetica faces;
//! missing fields render as empty strings or fixed defaults, never as
//! errors.

mod format;

pub use self::format::{format_date, format_period_monthyear};

use printpdf::*;

use crate::model::{InvoiceData, LineItemData};
use crate::render::format::{approx_text_width, to_winlatin, wrap_hard};

const PAGE_WIDTH_PT: f32 = 595.2756;
const PAGE_HEIGHT_PT: f32 = 841.8898;
const PT_TO_MM: f32 = 0.352778;

/// The summary always presents itself as three pages.
const TOTAL_LOGICAL_PAGES: u32 = 3;

/// Remaining-height thresholds (mm) that trigger a physical page break.
const ITEM_BREAK_MM: f32 = 60.0;
const ATTACHMENT_BREAK_MM: f32 = 50.0;

/// Hard-wrap threshold for note paragraphs.
const NOTE_WRAP_CHARS: usize = 80;

const FOOTER_TEXT: &str = "* Wichtig: Dieses Dokument ist eine automatisch generierte \
     Zusammenfassung der E-Rechnung, es ersetzt nicht die Originaldatei!";

fn mm(v: f32) -> f32 {
    v * 72.0 / 25.4
}

/// The right-aligned header line shown on every page.
pub fn header_line(invoice_id: Option<&str>, issue_date: Option<&str>) -> String {
    format!(
        "Rechnungsnummer: {} | Datum: {}",
        invoice_id.unwrap_or(""),
        format_date(issue_date)
    )
}

/// Render the three-logical-page summary for `data` into PDF bytes.
///
/// `base_name` is the output file stem; page 3 uses it to synthesize the
/// attachment filenames listed next to each document reference.
pub fn render_summary(data: &InvoiceData, base_name: &str) -> Vec<u8> {
    let pages = compose_pages(data, base_name);

    let mut doc = PdfDocument::new(base_name);
    doc.with_pages(pages);
    doc.save(&PdfSaveOptions::default(), &mut Vec::new())
}

fn opt(o: &Option<String>) -> &str {
    o.as_deref().unwrap_or("")
}

/// Lay out all content blocks and return the physical pages.
fn compose_pages(data: &InvoiceData, base_name: &str) -> Vec<PdfPage> {
    let mut c = Composer::new(data);
    page_overview(&mut c, data);
    page_payment_and_details(&mut c, data);
    page_contract_and_attachments(&mut c, data, base_name);
    c.pages
}

/// Vertical-cursor page writer.
///
/// Tracks the logical page index (what the header claims) separately
/// from the list of physical pages actually emitted.
struct Composer<'a> {
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    /// Cursor in points from the bottom edge, reportlab-style.
    y: f32,
    logical_page: u32,
    data: &'a InvoiceData,
}

impl<'a> Composer<'a> {
    fn new(data: &'a InvoiceData) -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: 0.0,
            logical_page: 0,
            data,
        }
    }

    /// Open a fresh logical page: header plus cursor at the content top.
    fn begin_logical_page(&mut self, logical: u32) {
        self.logical_page = logical;
        self.draw_header();
        self.y = PAGE_HEIGHT_PT - mm(30.0);
    }

    /// Close the current physical page (footer last).
    fn finish_page(&mut self) {
        self.draw_footer();
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(
            Mm(PAGE_WIDTH_PT * PT_TO_MM),
            Mm(PAGE_HEIGHT_PT * PT_TO_MM),
            ops,
        ));
    }

    /// Overflow onto an additional physical page carrying the same
    /// logical header and page label.
    fn break_physical(&mut self) {
        self.finish_page();
        self.draw_header();
        self.y = PAGE_HEIGHT_PT - mm(30.0);
    }

    /// Break when less than `min_mm` of page height remains.
    fn ensure_space(&mut self, min_mm: f32) {
        if self.y < mm(min_mm) {
            self.break_physical();
        }
    }

    fn draw_header(&mut self) {
        let top_y = PAGE_HEIGHT_PT - mm(20.0);
        let d = self.data;

        self.text_at(
            mm(30.0),
            top_y,
            BuiltinFont::HelveticaBold,
            12.0,
            &format!("E-Rechnung | {}", opt(&d.supplier.name)),
        );

        let header = header_line(d.invoice_id.as_deref(), d.issue_date.as_deref());
        let hx = PAGE_WIDTH_PT - mm(30.0) - approx_text_width(&header, 9.0);
        self.text_at(hx, top_y, BuiltinFont::Helvetica, 9.0, &header);

        let page_label = format!("Seite {} / {}", self.logical_page, TOTAL_LOGICAL_PAGES);
        let px = PAGE_WIDTH_PT - mm(30.0) - approx_text_width(&page_label, 9.0);
        self.text_at(px, top_y - 6.0, BuiltinFont::Helvetica, 9.0, &page_label);
    }

    fn draw_footer(&mut self) {
        self.text_at(
            mm(30.0),
            mm(15.0),
            BuiltinFont::HelveticaOblique,
            7.0,
            FOOTER_TEXT,
        );
    }

    fn text_at(&mut self, x: f32, y: f32, font: BuiltinFont, size: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_winlatin(text))],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Draw at the cursor and advance it.
    fn row(&mut self, x_mm: f32, font: BuiltinFont, size: f32, text: &str, advance_mm: f32) {
        self.text_at(mm(x_mm), self.y, font, size, text);
        self.y -= mm(advance_mm);
    }

    /// Page title, bold 12 pt.
    fn title(&mut self, text: &str) {
        self.row(30.0, BuiltinFont::HelveticaBold, 12.0, text, 10.0);
    }

    /// Section heading, bold 10 pt.
    fn section(&mut self, text: &str) {
        self.row(30.0, BuiltinFont::HelveticaBold, 10.0, text, 6.0);
    }

    /// Regular field line, indented one step.
    fn field(&mut self, text: &str) {
        self.row(35.0, BuiltinFont::Helvetica, 9.0, text, 5.0);
    }

    /// Regular field line, indented two steps (item/attachment details).
    fn detail(&mut self, text: &str) {
        self.row(40.0, BuiltinFont::Helvetica, 9.0, text, 5.0);
    }

    /// Label/amount pair in two columns.
    fn amount_row(&mut self, x_mm: f32, label: &str, value: &str) {
        self.text_at(mm(x_mm), self.y, BuiltinFont::Helvetica, 9.0, label);
        self.text_at(mm(110.0), self.y, BuiltinFont::Helvetica, 9.0, value);
        self.y -= mm(5.0);
    }

    fn gap(&mut self, gap_mm: f32) {
        self.y -= mm(gap_mm);
    }
}

// ---------------------------------------------------------------------------
// Logical page 1: Übersicht
// ---------------------------------------------------------------------------

fn page_overview(c: &mut Composer<'_>, d: &InvoiceData) {
    c.begin_logical_page(1);
    c.title("Übersicht");

    c.section("Informationen zum Käufer");
    c.field(&format!(
        "Käuferreferenz: {}",
        d.buyer_reference.as_deref().unwrap_or("–")
    ));
    let buyer_name = d
        .customer
        .registration_name
        .as_deref()
        .or(d.customer.name.as_deref())
        .unwrap_or("");
    c.field(&format!("Name: {buyer_name}"));
    c.field(&format!("Adresszeile 1: {}", opt(&d.customer.street)));
    c.field(&format!("PLZ: {}", opt(&d.customer.postal_zone)));
    c.field(&format!("Ort: {}", opt(&d.customer.city)));
    c.field(&format!("Ländercode: {}", opt(&d.customer.country_code)));
    c.gap(3.0);

    c.section("Informationen zum Verkäufer");
    c.field(&format!("Firmenname: {}", opt(&d.supplier.name)));
    c.field(&format!("Adresszeile 1: {}", opt(&d.supplier.street)));
    c.field(&format!("PLZ: {}", opt(&d.supplier.postal_zone)));
    c.field(&format!("Ort: {}", opt(&d.supplier.city)));
    c.field(&format!("Ländercode: {}", opt(&d.supplier.country_code)));
    c.field(&format!("Name: {}", opt(&d.supplier.contact.name)));
    c.field(&format!("Telefon: {}", opt(&d.supplier.contact.telephone)));
    c.field(&format!("E-Mail-Adresse: {}", opt(&d.supplier.contact.email)));
    c.gap(3.0);

    c.section("Rechnungsdaten");
    c.field(&format!("Rechnungsnummer: {}", opt(&d.invoice_id)));
    c.field(&format!(
        "Rechnungsdatum: {}",
        format_date(d.issue_date.as_deref())
    ));
    c.field(&format!("Rechnungsart: {}", opt(&d.invoice_type_code)));
    c.field(&format!("Währung: {}", opt(&d.currency)));
    c.gap(3.0);

    c.section("Abrechnungszeitraum");
    c.field(&format!(
        "Von: {}  Bis: {}",
        format_date(d.period_start.as_deref()),
        format_date(d.period_end.as_deref())
    ));
    c.gap(3.0);

    c.section("Gesamtbeträge der Rechnung");
    let mt = &d.monetary_total;
    let amount = |v: &Option<String>| v.as_deref().unwrap_or("0.00").to_string();
    c.amount_row(35.0, "Summe aller Positionen", &amount(&mt.line_extension_amount));
    c.amount_row(35.0, "Summe Nachlässe", &amount(&mt.allowance_total_amount));
    c.amount_row(35.0, "Summe Zuschläge", &amount(&mt.charge_total_amount));
    c.amount_row(35.0, "Gesamtsumme", &amount(&mt.tax_exclusive_amount));
    c.amount_row(35.0, "Summe Umsatzsteuer", &amount(&d.tax_total.tax_amount));
    c.amount_row(35.0, "Gesamtsumme", &amount(&mt.tax_inclusive_amount));
    c.amount_row(35.0, "Summe Fremdforderungen", "0.00");
    c.amount_row(35.0, "Fälliger Betrag", &amount(&mt.payable_amount));
    c.gap(3.0);

    c.section("Aufschlüsselung der Umsatzsteuer auf Ebene der Rechnung");
    let sub = &d.tax_total.subtotal;
    c.field(&format!("Umsatzsteuerkategorie: {}", opt(&sub.category.id)));
    c.amount_row(35.0, "Gesamtsumme", opt(&sub.taxable_amount));
    c.amount_row(35.0, "Umsatzsteuersatz", &percent_text(&sub.category.percent));
    c.amount_row(35.0, "Umsatzsteuerbetrag", opt(&sub.tax_amount));
    c.gap(3.0);

    // Values follow on page 2.
    c.section("Zahlungsdaten");
    c.gap(6.0);

    c.finish_page();
}

fn percent_text(percent: &Option<String>) -> String {
    percent
        .as_deref()
        .map(|p| format!("{p}%"))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Logical page 2: Zahlungsdetails, Bemerkungen, Positionen
// ---------------------------------------------------------------------------

fn page_payment_and_details(c: &mut Composer<'_>, d: &InvoiceData) {
    c.begin_logical_page(2);

    c.row(
        30.0,
        BuiltinFont::HelveticaBold,
        10.0,
        &format!("Fälligkeitsdatum: {}", format_date(d.due_date.as_deref())),
        8.0,
    );

    c.section("Code für das Zahlungsmittel:");
    c.field(opt(&d.payment_means.means_code));
    c.gap(3.0);

    // The payment reference reuses the invoice number.
    c.section("Verwendungszweck:");
    c.field(opt(&d.invoice_id));
    c.gap(3.0);

    c.row(30.0, BuiltinFont::HelveticaBold, 10.0, "Überweisung", 8.0);
    let acc = &d.payment_means.account;
    c.field(&format!("Kontoinhaber: {}", opt(&acc.name)));
    c.field(&format!("IBAN: {}", opt(&acc.id)));
    c.field(&format!("BIC: {}", opt(&acc.bic)));
    c.gap(3.0);

    c.section("Bemerkungen zur Rechnung");
    for paragraph in opt(&d.note).split('|') {
        let text = paragraph.trim();
        if text.is_empty() {
            continue;
        }
        for line in wrap_hard(text, NOTE_WRAP_CHARS) {
            c.field(&line);
        }
    }

    let period = format_period_monthyear(d.period_start.as_deref(), d.period_end.as_deref());
    if !period.is_empty() {
        c.field(&format!("Leistungszeitraum: {period}"));
        c.gap(3.0);
    } else {
        c.gap(5.0);
    }
    c.gap(5.0);

    c.row(30.0, BuiltinFont::HelveticaBold, 10.0, "Details", 8.0);
    for (idx, item) in d.items.iter().enumerate() {
        render_item(c, idx + 1, item);
        // Data-dependent page break: keep at least 60 mm of room.
        c.ensure_space(ITEM_BREAK_MM);
    }

    c.gap(5.0);
    c.section("Informationen zum Verkäufer");
    c.field(&format!(
        "Abweichender Handelsname: {}",
        opt(&d.supplier.registration_name)
    ));
    c.field(&format!(
        "Elektronische Adresse: {}",
        opt(&d.supplier.contact.email)
    ));
    c.field("Schema der elektronischen Adresse:");
    c.field(&format!("Umsatzsteuer-ID: {}", opt(&d.supplier.company_id)));
    c.gap(3.0);

    c.section("Informationen zum Käufer");
    c.field(&format!(
        "Abweichender Handelsname: {}",
        opt(&d.customer.registration_name)
    ));
    c.field("Elektronische Adresse: ");
    c.gap(3.0);

    c.finish_page();
}

fn render_item(c: &mut Composer<'_>, position: usize, item: &LineItemData) {
    c.row(
        30.0,
        BuiltinFont::HelveticaBold,
        9.0,
        &format!("Position: {position}"),
        6.0,
    );

    c.row(35.0, BuiltinFont::HelveticaBold, 9.0, "Preiseinzelheiten", 6.0);
    c.amount_row(40.0, "Menge", opt(&item.quantity));
    c.amount_row(40.0, "Einheit", opt(&item.quantity_unit));
    c.amount_row(40.0, "Preis pro Einheit (netto)", opt(&item.price_amount));
    c.amount_row(40.0, "Gesamtpreis (netto)", opt(&item.line_extension_amount));
    c.detail(&format!(
        "Basismenge zum Artikelpreis: {}",
        opt(&item.base_quantity)
    ));
    c.detail(&format!(
        "Code der Maßeinheit: {}",
        opt(&item.base_quantity_unit)
    ));
    c.detail(&format!("Umsatzsteuer: {}", opt(&item.tax_category.id)));
    c.detail(&format!(
        "Umsatzsteuersatz: {}",
        percent_text(&item.tax_category.percent)
    ));
    c.gap(3.0);

    c.row(35.0, BuiltinFont::HelveticaBold, 9.0, "Artikelinformationen", 6.0);
    c.detail(&format!("Bezeichnung: {}", opt(&item.item_name)));
    c.gap(3.0);

    // Blank spacer between positions.
    c.gap(5.0);
}

// ---------------------------------------------------------------------------
// Logical page 3: Vertrag und Anlagen
// ---------------------------------------------------------------------------

fn page_contract_and_attachments(c: &mut Composer<'_>, d: &InvoiceData, base_name: &str) {
    c.begin_logical_page(3);

    // Placeholder block — the scheme is not captured from the XML.
    c.row(
        30.0,
        BuiltinFont::HelveticaBold,
        10.0,
        "Schema der elektronischen Adresse:",
        8.0,
    );

    c.section("Informationen zum Vertrag");
    c.field(&format!("Spezifikationskennung: {}", opt(&d.profile_id)));
    c.field(&format!("Prozesskennung: {}", opt(&d.customization_id)));
    c.gap(5.0);

    c.section("Anlagen");
    c.field("Rechnungsbegründende Unterlagen");
    c.gap(1.0);

    for (idx, doc) in d.additional_documents.iter().enumerate() {
        let n = idx + 1;
        // Identifier falls back to the 1-based sequence number.
        let id = doc
            .id
            .clone()
            .unwrap_or_else(|| n.to_string());
        c.detail(&format!("Kennung: {id}"));
        c.detail(&format!("Beschreibung: {}", opt(&doc.description)));

        // Synthesized from sequence position; never checked against the
        // attachment files actually extracted.
        let filename = format!("{base_name}_Anhang{n}.pdf");
        c.detail(&format!("Anhangsdokument: {filename}"));
        c.detail("Format des Anhangdokuments: application/pdf");
        c.detail(&format!("Name des Anhangdokuments: {filename}"));
        c.gap(5.0);

        c.ensure_space(ATTACHMENT_BREAK_MM);
    }

    c.finish_page();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentReference;

    fn minimal() -> InvoiceData {
        InvoiceData::default()
    }

    /// Text strings written on a page, in drawing order.
    fn written_texts(page: &PdfPage) -> Vec<String> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                Op::WriteTextBuiltinFont { items, .. } => {
                    items.iter().find_map(|item| match item {
                        TextItem::Text(t) => Some(t.clone()),
                        _ => None,
                    })
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_invoice_renders_three_pages() {
        let pages = compose_pages(&minimal(), "test");
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn missing_totals_render_as_zero_amounts() {
        let pages = compose_pages(&minimal(), "test");
        let texts = written_texts(&pages[0]);
        // Seven absent document totals plus the fixed third-party row.
        let zeros = texts.iter().filter(|t| t.as_str() == "0.00").count();
        assert_eq!(zeros, 8);
    }

    #[test]
    fn item_block_shows_quantity_and_unit() {
        let mut data = minimal();
        data.items.push(LineItemData {
            id: Some("1".into()),
            quantity: Some("2".into()),
            quantity_unit: Some("HUR".into()),
            item_name: Some("Beratung".into()),
            ..LineItemData::default()
        });
        let pages = compose_pages(&data, "test");
        let texts = written_texts(&pages[1]);

        let menge = texts.iter().position(|t| t == "Menge").unwrap();
        assert_eq!(texts[menge + 1], "2");
        let einheit = texts.iter().position(|t| t == "Einheit").unwrap();
        assert_eq!(texts[einheit + 1], "HUR");
    }

    #[test]
    fn many_items_overflow_onto_extra_pages() {
        let mut data = minimal();
        for i in 0..20 {
            data.items.push(LineItemData {
                id: Some(i.to_string()),
                item_name: Some(format!("Posten {i}")),
                ..LineItemData::default()
            });
        }
        let pages = compose_pages(&data, "test");
        assert!(pages.len() > 3, "expected overflow, got {}", pages.len());
    }

    #[test]
    fn many_document_references_overflow_page_three() {
        let mut data = minimal();
        for i in 0..25 {
            data.additional_documents.push(DocumentReference {
                id: Some(format!("DOC-{i}")),
                description: Some("Vertrag".into()),
            });
        }
        let pages = compose_pages(&data, "test");
        assert!(pages.len() > 3);
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let bytes = render_summary(&minimal(), "test");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn header_line_formats_id_and_date() {
        assert_eq!(
            header_line(Some("R-2025-001"), Some("2025-05-10")),
            "Rechnungsnummer: R-2025-001 | Datum: 10.5.2025"
        );
        assert_eq!(header_line(None, None), "Rechnungsnummer:  | Datum: ");
    }
}
