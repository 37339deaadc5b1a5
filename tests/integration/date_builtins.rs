mod common;
use common::{run_bool, run_int, run_str};

#[test]
fn add_days_rolls_over_the_leap_day() {
    let src = "fun main(): string { var d = Date.createDate(2024, 2, 29); return Date.formatDate(Date.addDays(d, 1)) }";
    assert_eq!(run_str(src), "2024-03-01");
}

#[test]
fn leap_year_rules() {
    assert!(run_bool("fun main(): bool { return Date.isLeapYear(2000) }"));
    assert!(!run_bool("fun main(): bool { return Date.isLeapYear(1900) }"));
    assert!(run_bool("fun main(): bool { return Date.isLeapYear(2024) }"));
}

#[test]
fn days_in_month() {
    assert_eq!(run_int("fun main(): int { return Date.daysInMonth(2023, 2) }"), 28);
    assert_eq!(run_int("fun main(): int { return Date.daysInMonth(2024, 2) }"), 29);
    assert_eq!(run_int("fun main(): int { return Date.daysInMonth(2024, 12) }"), 31);
}

#[test]
fn subtract_days_inverts_add() {
    let src = "fun main(): string {\n\
                   var d = Date.createDate(2024, 3, 1)\n\
                   return Date.formatDate(Date.subtractDays(d, 1))\n\
               }";
    assert_eq!(run_str(src), "2024-02-29");
}

#[test]
fn add_days_crosses_years() {
    let src = "fun main(): string {\n\
                   var d = Date.createDate(2023, 12, 31)\n\
                   return Date.formatDate(Date.addDays(d, 1))\n\
               }";
    assert_eq!(run_str(src), "2024-01-01");
}

#[test]
fn day_of_week_uses_zeller_numbering() {
    // 0 = Saturday ... 6 = Friday; 2024-01-01 was a Monday
    let src = "fun main(): int { return Date.dayOfWeek(Date.createDate(2024, 1, 1)) }";
    assert_eq!(run_int(src), 2);
}

#[test]
fn date_values_are_plain_structs() {
    let src = "fun main(): int {\n\
                   var d = Date.createDate(2024, 5, 17)\n\
                   return d.year * 10000 + d.month * 100 + d.day\n\
               }";
    assert_eq!(run_int(src), 20240517);
}

#[test]
fn bare_aliases_point_at_the_date_bindings() {
    let src = "fun main(): string { return formatDate(createDate(2023, 1, 2)) }";
    assert_eq!(run_str(src), "2023-01-02");
    // the bare `now` is Date's, so its result has date fields
    assert!(run_bool("fun main(): bool { var d = now(); return d.year > 2000 }"));
}

#[test]
fn today_formats_as_iso_date() {
    let s = run_str("fun main(): string { return Date.today() }");
    assert_eq!(s.len(), 10);
    assert_eq!(&s[4..5], "-");
    assert_eq!(&s[7..8], "-");
}

#[test]
fn current_date_parts_are_sane() {
    assert!(run_int("fun main(): int { return Date.currentYear() }") >= 2024);
    let m = run_int("fun main(): int { return Date.currentMonth() }");
    assert!((1..=12).contains(&m));
    let d = run_int("fun main(): int { return Date.currentDay() }");
    assert!((1..=31).contains(&d));
}

#[test]
fn time_now_matches_the_timestamp_convention() {
    let s = run_str("fun main(): string { return Time.now() }");
    assert_eq!(s.len(), 19);
    assert_eq!(&s[10..11], " ");
}

#[test]
fn time_timestamp_is_positive() {
    assert!(run_int("fun main(): int { return Time.timestamp() }") > 1_500_000_000);
}

#[test]
fn time_format_substitutes_tokens() {
    let s = run_str("fun main(): string { return Time.format(\"YYYY-MM-DD\") }");
    assert_eq!(s.len(), 10);
}

#[test]
fn date_math_composes_with_user_code() {
    let src = "fun end_of_month(y: int, m: int): string {\n\
                   return Date.formatDate(Date.createDate(y, m, Date.daysInMonth(y, m)))\n\
               }\n\
               fun main(): string { return end_of_month(2024, 2) }";
    assert_eq!(run_str(src), "2024-02-29");
}
