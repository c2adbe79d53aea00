//! Prompts for the auxiliary LLM calls
//!
//! Tool selection uses the configured system prompt; these cover the
//! secondary calls a turn may make.

use chrono::NaiveDate;

pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional translator. Your task is to translate the following Arabic text to English for a travel agency's WhatsApp bot. The translation must be accurate, professional, and friendly. Preserve the WhatsApp markdown formatting (like *bold text*). Do not add any extra text or commentary, only provide the translation.";

pub const TRANSLATION_TEMPERATURE: f32 = 0.1;
pub const FILTER_TEMPERATURE: f32 = 0.0;
pub const HANDOFF_TEMPERATURE: f32 = 0.7;
pub const HANDOFF_MAX_TOKENS: u32 = 100;

/// Ask for the subset of `services_json` matching `query`
pub fn service_filter(query: &str, services_json: &str) -> String {
    format!(
        "أنت خبير في مطابقة خدمات السفر. مهمتك هي تحليل طلب المستخدم وإيجاد أفضل خدمة مطابقة له من قائمة الخدمات المتوفرة.\
         \n\n- طلب المستخدم هو: '{}'\
         \n- قائمة الخدمات (JSON): {}\
         \n\nالرجاء إعادة قائمة JSON تحتوي *فقط* على الخدمة (أو الخدمات) التي تلبي طلب المستخدم بشكل مباشر. إذا لم تكن هناك خدمة مطابقة تماماً، أعد قائمة فارغة [].",
        query, services_json
    )
}

/// Ask for the subset of `flights_json` matching a free-form time expression
pub fn flight_time_filter(today: NaiveDate, time_query: &str, flights_json: &str) -> String {
    format!(
        "أنت خبير في تحليل البيانات. أمامك قائمة رحلات طيران بصيغة JSON. مهمتك هي ترشيح هذه القائمة بناءً على طلب المستخدم الزمني.\
         \n\n- تاريخ اليوم هو: {}\
         \n- طلب المستخدم الزمني هو: '{}'\
         \n- بيانات الرحلات: {}\
         \n\nالرجاء إعادة قائمة JSON تحتوي فقط على الرحلات التي تتطابق بدقة مع طلب المستخدم. إذا لم توجد أي رحلات مطابقة، أعد قائمة فارغة [].",
        today.format("%Y-%m-%d"),
        time_query,
        flights_json
    )
}

/// Ask for a short reassurance before a human takes over
pub fn handoff_message(company: &str, reason: &str, details: Option<&str>) -> String {
    let details = details
        .map(|d| format!(" بخصوص '{}'", d))
        .unwrap_or_default();
    format!(
        "أنت مساعد آلي ودود ومتعاون في شركة '{}'. \
         مهمتك هي كتابة رسالة قصيرة ولطيفة لإبلاغ العميل بأنه سيتم تحويله الآن إلى موظف بشري. \
         السبب هو '{}'{}. \
         اكتب رسالة طبيعية ومطمئنة باللغة العربية، تشرح فيها أن الموظف سيتابع معه لإكمال طلبه.",
        company, reason, details
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_message_details() {
        let with = handoff_message("الشركة", "تثبيت عرض", Some("رحلة إلى دبي"));
        assert!(with.contains("السبب هو 'تثبيت عرض' بخصوص 'رحلة إلى دبي'."));

        let without = handoff_message("الشركة", "تثبيت عرض", None);
        assert!(without.contains("السبب هو 'تثبيت عرض'."));
        assert!(without.contains("شركة 'الشركة'"));
    }

    #[test]
    fn test_flight_filter_includes_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let prompt = flight_time_filter(today, "الأسبوع القادم", "[]");
        assert!(prompt.contains("تاريخ اليوم هو: 2026-03-01"));
        assert!(prompt.contains("'الأسبوع القادم'"));
    }
}
