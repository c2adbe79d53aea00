//! Canned replies for small talk
//!
//! Matched exactly after trimming and lowercasing; anything else goes to the
//! model.

const ROUTINE_REPLIES: &[(&[&str], &str)] = &[
    (&["شكرا", "مشكور", "يسلمو"], "على الرحب والسعة!"),
    (&["مرحبا", "هلا", "السلام عليكم"], "أهلاً بك. كيف يمكنني خدمتك؟"),
    (&["تمام", "اوك", "ك"], "بالخدمة."),
];

pub fn routine_reply(message: &str) -> Option<&'static str> {
    let message = message.trim().to_lowercase();
    ROUTINE_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.contains(&message.as_str()))
        .map(|(_, reply)| *reply)
}
