//! Profile renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ProfileView;

pub fn render_profile(out: &mut String, row: usize, profile: &ProfileView, theme: &Theme) -> usize {
    let fields = [
        ("Name", Some(profile.name.as_str())),
        ("Email", profile.email.as_deref()),
        ("Student ID", profile.student_id.as_deref()),
        ("Phone", profile.phone.as_deref()),
        ("Rating", Some(profile.rating.as_str())),
    ];

    let mut current_row = row + 1;
    for (label, value) in fields {
        position_cursor(out, current_row, 1);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&format!("  {label:<12}"));
        match value {
            Some(value) => {
                out.push_str(&Theme::fg(&theme.colors.text_normal));
                out.push_str(value);
            }
            None => {
                out.push_str(Theme::dim());
                out.push_str("not set");
            }
        }
        out.push_str(Theme::reset());
        current_row += 1;
    }
    current_row
}
