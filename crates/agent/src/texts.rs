//! Fixed Arabic copy sent to users and operators
//!
//! Everything here is authored in Arabic; English senders get it through the
//! translator.

pub const INVALID_CHOICE: &str = "خيار غير صالح. يرجى اختيار رقم من القائمة.";
pub const SUMMARY_FOOTER: &str = "\nلمعرفة التفاصيل الكاملة، يرجى إرسال الرقم.";

pub const NO_SERVICES_AVAILABLE: &str = "عفواً، لا تتوفر لدينا أي خدمات حالياً.";
pub const NO_MATCHING_SERVICE: &str = "عفواً، لا تتوفر لدينا هذه الخدمة حالياً.";

pub const PAUSE_CONFIRMATION: &str = "تم إيقاف المساعد الآلي. يمكنك الآن التحدث مباشرة مع الموظف";
pub const RESUME_NOTICE: &str = "المساعد الآلي عاد لخدمتك.";

/// Handoff reason used when a turn fails
pub const TECHNICAL_FAILURE_REASON: &str = "فشل فني في النظام.";

pub const NOT_AVAILABLE: &str = "N/A";

pub mod titles {
    pub const SERVICES: &str = "الخدمات المتوفرة";
    pub const MATCHING_SERVICES: &str = "الخدمات المطابقة لبحثك";
    pub const OFFERS: &str = "العروض السياحية";
    pub const UMRAH: &str = "باقات العمرة";
    pub const FLIGHTS: &str = "رحلات الطيران";
    pub const VISA_COUNTRIES: &str = "الدول التي نوفر لها فيزا";
    pub const VISA_TYPES: &str = "أنواع الفيزا المتوفرة";

    pub fn flight_search(destination: &str, origin: Option<&str>) -> String {
        match origin {
            Some(origin) => format!("الرحلات القادمة من {} إلى {}", origin, destination),
            None => format!("الرحلات القادمة إلى {}", destination),
        }
    }
}

pub fn summary_header(title: &str) -> String {
    format!("أهلاً بك، هذه هي {} المتوفرة لدينا حالياً:", title)
}

pub fn empty_list(title: &str) -> String {
    format!("عفواً، لا توجد {} متاحة حالياً.", title)
}

pub fn no_visa_for_country(country: &str) -> String {
    format!("عفواً، لا توجد معلومات عن فيزا لدولة *{}*.", country)
}

pub fn no_visa_of_type(visa_type: &str) -> String {
    format!("عفواً، لا توجد معلومات عن فيزا من نوع *{}*.", visa_type)
}

pub fn choose_visa_type_for(country: &str) -> String {
    format!("اختر نوع الفيزا لدولة *{}*:", country)
}

pub fn choose_country_for(visa_type: &str) -> String {
    format!("اختر الدولة لفيزا (*{}*):", visa_type)
}

/// Alert sent to the operator address on handoff
pub fn operator_alert(sender_id: &str, reason: &str) -> String {
    format!(
        "*تنبيه: مطلوب تدخل بشري*\n\nالعميل `{}` بحاجة إلى مساعدة.\n\n*السبب:* {}\n\nيرجى فتح واتساب والتواصل معه.",
        sender_id, reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_wording() {
        assert_eq!(
            empty_list(titles::FLIGHTS),
            "عفواً، لا توجد رحلات الطيران متاحة حالياً."
        );
    }

    #[test]
    fn test_flight_search_title() {
        assert_eq!(titles::flight_search("دبي", None), "الرحلات القادمة إلى دبي");
        assert_eq!(
            titles::flight_search("دبي", Some("دمشق")),
            "الرحلات القادمة من دمشق إلى دبي"
        );
    }

    #[test]
    fn test_operator_alert() {
        let alert = operator_alert("963900000000@c.us", "تثبيت عرض: رحلة إلى دبي");
        assert!(alert.starts_with("*تنبيه: مطلوب تدخل بشري*\n\n"));
        assert!(alert.contains("`963900000000@c.us`"));
        assert!(alert.contains("*السبب:* تثبيت عرض: رحلة إلى دبي"));
    }
}
