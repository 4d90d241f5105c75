/// Format an amount stored in cents for display, e.g. `1234` → `"$12.34"`.
pub fn format_amount(amount_cents: u64) -> String {
    format!("${}.{:02}", amount_cents / 100, amount_cents % 100)
}
