use crate::report::RiskLevel;
use crate::rules::PhiCategory;
use crate::scanner::{PhiScanner, ScanError, ScannerConfig};

fn scan(text: &str) -> crate::report::ScanResult {
    PhiScanner::new().scan(text).unwrap()
}

#[test]
fn empty_input_yields_perfect_score() {
    let result = scan("");
    assert!(result.violations.is_empty());
    assert_eq!(result.redacted_text, "");
    assert_eq!(result.total_violation_count, 0);
    assert_eq!(result.compliance_score, 100);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.estimated_fine_exposure, 0);
    assert_eq!(result.urgency_score, 0);
}

#[test]
fn benign_text_yields_perfect_score() {
    let text = "totally benign text with no identifiers";
    let result = scan(text);
    assert!(result.violations.is_empty());
    assert_eq!(result.redacted_text, text);
    assert_eq!(result.compliance_score, 100);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.estimated_fine_exposure, 0);
    assert_eq!(result.urgency_score, 0);
}

#[test]
fn scan_is_deterministic() {
    let text = "SSN 123-45-6789, call 555-123-4567, MRN: 445566";
    let first = scan(text);
    let second = scan(text);
    assert_eq!(first, second);
}

#[test]
fn fine_risk_saturates_at_three_occurrences() {
    let text = (0..10)
        .map(|i| format!("record {i}: 123-45-678{i}"))
        .collect::<Vec<_>>()
        .join("\n");

    let result = scan(&text);
    let ssn = result
        .violations
        .iter()
        .find(|v| v.category == PhiCategory::Ssn)
        .unwrap();

    assert_eq!(ssn.occurrence_count, 10);
    assert_eq!(ssn.fine_risk, 50_000 * 3);
}

#[test]
fn compliance_score_counts_categories_not_occurrences() {
    // Three distinct categories, with the email category matching three times.
    let text = "SSN 123-45-6789. Emails: a@x.com b@x.com c@x.com. MRN: 12345.";
    let result = scan(text);

    assert_eq!(result.violations.len(), 3);
    assert_eq!(result.compliance_score, 100 - 12 * 3);
}

#[test]
fn sample_matches_cap_at_three_in_appearance_order() {
    let text = "one@a.com then two@b.com then three@c.com then four@d.com then five@e.com";
    let result = scan(text);
    let email = result
        .violations
        .iter()
        .find(|v| v.category == PhiCategory::Email)
        .unwrap();

    assert_eq!(email.occurrence_count, 5);
    assert_eq!(
        email.sample_matches,
        vec!["one@a.com", "two@b.com", "three@c.com"]
    );
}

#[test]
fn end_to_end_patient_record() {
    let text = "Patient John Smith, SSN: 123-45-6789, DOB: 01/15/1980, \
                Phone: 555-123-4567, Email: john.smith@email.com";
    let result = scan(text);

    let categories: Vec<PhiCategory> = result.violations.iter().map(|v| v.category).collect();
    assert_eq!(
        categories,
        vec![
            PhiCategory::Ssn,
            PhiCategory::Phone,
            PhiCategory::Email,
            PhiCategory::DateOfBirth,
        ]
    );
    assert!(result.violations.iter().all(|v| v.occurrence_count == 1));

    assert_eq!(result.total_violation_count, 4);
    assert_eq!(result.compliance_score, 52);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.urgency_score, 10);
    assert_eq!(result.estimated_fine_exposure, 50_000 + 25_000 + 25_000 + 50_000);

    assert!(result.redacted_text.contains("[SSN_REDACTED]"));
    assert!(result.redacted_text.contains("[DOB_REDACTED]"));
    assert!(result.redacted_text.contains("[PHONE_REDACTED]"));
    assert!(result.redacted_text.contains("[EMAIL_REDACTED]"));
    assert!(!result.redacted_text.contains("123-45-6789"));
    assert!(!result.redacted_text.contains("01/15/1980"));
    assert!(!result.redacted_text.contains("555-123-4567"));
    assert!(!result.redacted_text.contains("john.smith@email.com"));
    assert!(result.redacted_text.contains("Patient John Smith"));
}

#[test]
fn zero_match_categories_are_absent() {
    let result = scan("just an email: someone@example.org");
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].category, PhiCategory::Email);
}

#[test]
fn findings_follow_table_order_not_text_order() {
    // Email appears before the SSN in the text, but SSN is evaluated first.
    let text = "reach me at me@here.com, SSN 987-65-4321";
    let result = scan(text);
    let categories: Vec<PhiCategory> = result.violations.iter().map(|v| v.category).collect();
    assert_eq!(categories, vec![PhiCategory::Ssn, PhiCategory::Email]);
}

#[test]
fn categories_do_not_dedupe_against_each_other() {
    // A bare nine-digit run satisfies the SSN shape; the same digits with
    // different grouping can land in other numeric categories. Each rule
    // counts against the original text independently.
    let text = "id 123456789 and card 4532 0151 1283 0366";
    let result = scan(text);

    let ssn = result
        .violations
        .iter()
        .find(|v| v.category == PhiCategory::Ssn);
    let card = result
        .violations
        .iter()
        .find(|v| v.category == PhiCategory::CreditCard);
    assert!(ssn.is_some());
    assert!(card.is_some());
}

#[test]
fn redaction_replaces_every_occurrence() {
    let text = "first 111-22-3333 then 444-55-6666";
    let result = scan(text);
    assert_eq!(
        result.redacted_text,
        "first [SSN_REDACTED] then [SSN_REDACTED]"
    );
}

#[test]
fn labeled_categories_redact_label_and_value() {
    let result = scan("chart notes MRN: 778899 stable");
    let mrn = &result.violations[0];
    assert_eq!(mrn.category, PhiCategory::MedicalRecordNumber);
    assert_eq!(mrn.sample_matches, vec!["MRN: 778899"]);
    assert_eq!(result.redacted_text, "chart notes [MRN_REDACTED] stable");
}

#[test]
fn all_eight_categories_floor_the_score() {
    let text = "SSN 123-45-6789; phone (555) 123-4567; mail a@b.co; born 02/03/1990; \
                MRN: 1122; Policy #AB12345; lives at 9 Elm Street; card 4111-1111-1111-1111";
    let result = scan(text);

    assert_eq!(result.violations.len(), 8);
    // 100 - 12 * 8 clamps to zero
    assert_eq!(result.compliance_score, 0);
    assert_eq!(result.risk_level, RiskLevel::High);
    // 4 critical categories and 3 high categories; street address adds nothing
    assert_eq!(result.urgency_score, 3 * 4 + 2 * 3);
}

#[test]
fn size_guard_rejects_oversized_input() {
    let scanner = PhiScanner::with_config(ScannerConfig {
        max_input_bytes: Some(16),
    });

    let err = scanner.scan("this is definitely longer than sixteen bytes").unwrap_err();
    match err {
        ScanError::InputTooLarge { actual, limit } => {
            assert!(actual > limit);
            assert_eq!(limit, 16);
        }
    }

    assert!(scanner.scan("short").is_ok());
}

#[test]
fn size_guard_disabled_by_default() {
    let text = "x".repeat(1 << 20);
    assert!(PhiScanner::new().scan(&text).is_ok());
}

#[test]
fn pathological_repeated_digits_complete_quickly() {
    // Linear-time matching keeps adversarial input cheap.
    let text = "9".repeat(200_000);
    let result = scan(&text);
    assert!(result.violations.is_empty());
}
