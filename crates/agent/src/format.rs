//! Rendering of catalog items
//!
//! Detail views list only the fields present on the record. Summary lists
//! number their entries from 1 in the same order as the pending selection.

use travel_desk_core::{Flight, Offer, SelectableItem, Service, UmrahPackage, VisaRecord};

use crate::texts::{self, NOT_AVAILABLE};

/// Occupancy word for codes "1" to "10", anything else verbatim
pub fn hotel_occupancy(code: &str) -> &str {
    match code.trim() {
        "1" => "فردي",
        "2" => "ثنائي",
        "3" => "ثلاثي",
        "4" => "رباعي",
        "5" => "خماسي",
        "6" => "سداسي",
        "7" => "سباعي",
        "8" => "ثماني",
        "9" => "تساعي",
        "10" => "عشاري",
        _ => code,
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Collects `label: value` lines for present fields
struct Lines {
    parts: Vec<String>,
    bullet: &'static str,
}

impl Lines {
    fn new(title: String, bullet: &'static str) -> Self {
        Self {
            parts: vec![title],
            bullet,
        }
    }

    fn field(&mut self, label: &str, value: &Option<String>) -> &mut Self {
        self.field_with(label, value, |v| v.to_string())
    }

    fn field_with(
        &mut self,
        label: &str,
        value: &Option<String>,
        render: impl FnOnce(&str) -> String,
    ) -> &mut Self {
        if let Some(value) = value.as_deref() {
            self.parts
                .push(format!("{}*{}:* {}", self.bullet, label, render(value)));
        }
        self
    }

    fn prices(&mut self, usd: &Option<String>, syp: &Option<String>) -> &mut Self {
        self.field_with("السعر", usd, |v| format!("{} دولار أمريكي", v))
            .field_with("السعر", syp, |v| format!("{} ليرة سورية", v))
    }

    fn join(&self, separator: &str) -> String {
        self.parts.join(separator)
    }
}

/// One-line flight entry for summary lists
pub fn flight_summary(flight: &Flight) -> String {
    let mut line = format!(
        "رحلة من {} إلى {} | بتاريخ {}",
        or_na(&flight.depart_airport),
        or_na(&flight.destination_airport),
        or_na(&flight.depart_date)
    );
    if let Some(price) = &flight.usd_price {
        line.push_str(&format!(" | السعر: {}$", price));
    }
    line
}

pub fn flight_details(flight: &Flight) -> String {
    let title = format!(
        "*{} إلى {}*",
        flight.kind.as_deref().unwrap_or("رحلة"),
        or_na(&flight.destination_airport)
    );
    let mut lines = Lines::new(title, "• ");
    if let (Some(from), Some(to)) = (&flight.depart_airport, &flight.destination_airport) {
        lines.parts.push(format!("• *المسار:* من {} إلى {}", from, to));
    }
    lines
        .field("تاريخ الإقلاع", &flight.depart_date)
        .field("تاريخ العودة", &flight.return_date)
        .field("وقت الإقلاع", &flight.time_of_depart)
        .field("وقت الوصول", &flight.time_of_arrival)
        .field("مدة الرحلة", &flight.duration)
        .prices(&flight.usd_price, &flight.syp_price)
        .field("شركة الطيران", &flight.airline)
        .field("ملاحظات", &flight.notes)
        .join("\n")
}

pub fn offer_details(offer: &Offer) -> String {
    let mut lines = Lines::new(format!("إليك تفاصيل: *{}*", or_na(&offer.name)), "");
    if let (Some(from), Some(to)) = (&offer.depart, &offer.destination) {
        lines.parts.push(format!("*المسار:* من {} إلى {}", from, to));
    }
    lines
        .prices(&offer.usd_price, &offer.syp_price)
        .field("التفاصيل", &offer.details)
        .field("صالح لغاية", &offer.valid_until)
        .field("ملاحظات", &offer.notes)
        .join("\n\n")
}

pub fn service_details(service: &Service) -> String {
    Lines::new(
        format!("إليك تفاصيل خدمة: *{}*", or_na(&service.service)),
        "• ",
    )
    .prices(&service.usd_price, &service.syp_price)
    .field("التفاصيل", &service.details)
    .field("ملاحظات", &service.notes)
    .join("\n\n")
}

pub fn umrah_details(package: &UmrahPackage) -> String {
    Lines::new(format!("*{}*", or_na(&package.name_and_type)), "")
        .prices(&package.usd_price, &package.syp_price)
        .field_with("المدة", &package.duration, |v| format!("{} يوم", v))
        .field("آخر وقت للتسجيل", &package.last_date_for_register)
        .field("الشركة", &package.company_of_trasnport)
        .field("مدة الانجاز", &package.estimated_time)
        .field_with("السكن", &package.type_of_hotel, |v| hotel_occupancy(v).to_string())
        .field_with("تصنيف الفندق", &package.hotel_category, |v| format!("{} نجوم", v))
        .field("التفاصيل", &package.details)
        .field("الملاحظات", &package.notes)
        .join("\n")
}

pub fn visa_details(visa: &VisaRecord) -> String {
    let title = format!("*{} إلى {}*", or_na(&visa.visa_type), or_na(&visa.country));
    Lines::new(title, "• ")
        .prices(&visa.usd_price, &visa.syp_price)
        .field("المدة التقديرية", &visa.estimated_time)
        .field("الأوراق المطلوبة", &visa.required_papers)
        .field("صلاحية الفيزا", &visa.valid_until)
        .field("ملاحظات", &visa.notes)
        .join("\n")
}

/// Full detail view of a chosen item
pub fn details(item: &SelectableItem) -> String {
    match item {
        SelectableItem::Flight(f) => flight_details(f),
        SelectableItem::Offer(o) => offer_details(o),
        SelectableItem::Service(s) => service_details(s),
        SelectableItem::Umrah(u) => umrah_details(u),
        SelectableItem::Visa(v) => visa_details(v),
        SelectableItem::Label(label) => label.clone(),
    }
}

/// Text of a summary-list entry
pub fn item_label(item: &SelectableItem) -> String {
    match item {
        SelectableItem::Flight(f) => flight_summary(f),
        SelectableItem::Offer(o) => or_na(&o.name).to_string(),
        SelectableItem::Service(s) => or_na(&s.service).to_string(),
        SelectableItem::Umrah(u) => or_na(&u.name_and_type).to_string(),
        SelectableItem::Visa(v) => or_na(&v.visa_type).to_string(),
        SelectableItem::Label(label) => label.clone(),
    }
}

fn numbered(header: String, lines: impl Iterator<Item = String>) -> String {
    let mut out = vec![header, String::new()];
    out.extend(lines.enumerate().map(|(i, line)| format!("{}. {}", i + 1, line)));
    out.push(texts::SUMMARY_FOOTER.to_string());
    out.join("\n")
}

/// Numbered list with the standard greeting and footer
pub fn summary_list(title: &str, items: &[SelectableItem]) -> String {
    numbered(texts::summary_header(title), items.iter().map(item_label))
}

fn validity_suffix(visa: &VisaRecord) -> String {
    visa.valid_until
        .as_deref()
        .map(|v| format!(" - (صالحة لمدة) {}", v))
        .unwrap_or_default()
}

/// Types on offer for a country chosen from the country list
pub fn visa_types_menu(country: &str, visas: &[VisaRecord]) -> String {
    numbered(
        texts::choose_visa_type_for(country),
        visas
            .iter()
            .map(|v| format!("{} {}{}", country, or_na(&v.visa_type), validity_suffix(v))),
    )
}

/// Countries offering a visa type chosen from the type list
pub fn visa_countries_menu(visa_type: &str, visas: &[VisaRecord]) -> String {
    numbered(
        texts::choose_country_for(visa_type),
        visas.iter().map(|v| {
            let price = v
                .usd_price
                .as_deref()
                .map(|p| format!(" - {}$", p))
                .unwrap_or_default();
            format!("{}{}", or_na(&v.country), price)
        }),
    )
}

/// Types for a country named directly by the user
pub fn visa_details_menu(country: &str, visas: &[VisaRecord]) -> String {
    numbered(
        texts::choose_visa_type_for(country),
        visas
            .iter()
            .map(|v| format!("{}{}", or_na(&v.visa_type), validity_suffix(v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_hotel_occupancy() {
        assert_eq!(hotel_occupancy("2"), "ثنائي");
        assert_eq!(hotel_occupancy("10"), "عشاري");
        assert_eq!(hotel_occupancy("0"), "0");
        assert_eq!(hotel_occupancy("جناح"), "جناح");
        assert_eq!(hotel_occupancy(" 1 "), "فردي");
        assert_eq!(hotel_occupancy("01"), "01");
        assert_eq!(hotel_occupancy("+1"), "+1");
    }

    #[test]
    fn test_flight_summary() {
        let flight = Flight {
            depart_airport: s("دمشق"),
            destination_airport: s("دبي"),
            depart_date: s("2026-03-01"),
            usd_price: s("250"),
            ..Default::default()
        };
        assert_eq!(
            flight_summary(&flight),
            "رحلة من دمشق إلى دبي | بتاريخ 2026-03-01 | السعر: 250$"
        );

        let bare = Flight::default();
        assert_eq!(flight_summary(&bare), "رحلة من N/A إلى N/A | بتاريخ N/A");
    }

    #[test]
    fn test_flight_details_omits_missing_fields() {
        let flight = Flight {
            kind: s("ذهاب فقط"),
            depart_airport: s("دمشق"),
            destination_airport: s("دبي"),
            usd_price: s("250"),
            airline: s("أجنحة الشام"),
            ..Default::default()
        };
        assert_eq!(
            flight_details(&flight),
            "*ذهاب فقط إلى دبي*\n\
             • *المسار:* من دمشق إلى دبي\n\
             • *السعر:* 250 دولار أمريكي\n\
             • *شركة الطيران:* أجنحة الشام"
        );
    }

    #[test]
    fn test_offer_details_paragraphs() {
        let offer = Offer {
            name: s("شرم الشيخ"),
            usd_price: s("500"),
            valid_until: s("نهاية الشهر"),
            ..Default::default()
        };
        assert_eq!(
            offer_details(&offer),
            "إليك تفاصيل: *شرم الشيخ*\n\n*السعر:* 500 دولار أمريكي\n\n*صالح لغاية:* نهاية الشهر"
        );
    }

    #[test]
    fn test_umrah_details() {
        let package = UmrahPackage {
            name_and_type: s("عمرة رمضان"),
            duration: s("14"),
            type_of_hotel: s("4"),
            hotel_category: s("5"),
            ..Default::default()
        };
        assert_eq!(
            umrah_details(&package),
            "*عمرة رمضان*\n*المدة:* 14 يوم\n*السكن:* رباعي\n*تصنيف الفندق:* 5 نجوم"
        );
    }

    #[test]
    fn test_visa_details() {
        let visa = VisaRecord {
            visa_type: s("عمل"),
            country: s("مصر"),
            syp_price: s("1500000"),
            required_papers: s("جواز سفر"),
            ..Default::default()
        };
        assert_eq!(
            visa_details(&visa),
            "*عمل إلى مصر*\n• *السعر:* 1500000 ليرة سورية\n• *الأوراق المطلوبة:* جواز سفر"
        );
    }

    #[test]
    fn test_summary_list() {
        let items = vec![
            SelectableItem::Label("الأردن".to_string()),
            SelectableItem::Label("مصر".to_string()),
        ];
        assert_eq!(
            summary_list("الدول التي نوفر لها فيزا", &items),
            "أهلاً بك، هذه هي الدول التي نوفر لها فيزا المتوفرة لدينا حالياً:\n\n\
             1. الأردن\n2. مصر\n\nلمعرفة التفاصيل الكاملة، يرجى إرسال الرقم."
        );
    }

    #[test]
    fn test_visa_menus() {
        let visas = vec![
            VisaRecord {
                visa_type: s("سياحية"),
                country: s("مصر"),
                valid_until: s("3 أشهر"),
                usd_price: s("60"),
                ..Default::default()
            },
            VisaRecord {
                visa_type: s("عمل"),
                country: s("مصر"),
                ..Default::default()
            },
        ];

        let by_country = visa_types_menu("مصر", &visas);
        assert!(by_country.starts_with("اختر نوع الفيزا لدولة *مصر*:\n\n"));
        assert!(by_country.contains("1. مصر سياحية - (صالحة لمدة) 3 أشهر\n2. مصر عمل\n"));

        let by_type = visa_countries_menu("سياحية", &visas);
        assert!(by_type.starts_with("اختر الدولة لفيزا (*سياحية*):\n\n"));
        assert!(by_type.contains("1. مصر - 60$\n2. مصر\n"));

        let direct = visa_details_menu("مصر", &visas);
        assert!(direct.contains("1. سياحية - (صالحة لمدة) 3 أشهر\n2. عمل\n"));
    }
}
