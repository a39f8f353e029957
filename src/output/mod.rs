pub mod formatter;

pub use formatter::{
    format_combinations, format_enrollment_table, format_faculty_page, format_grant_table,
    format_report, format_report_tsv, format_scale, scale_track, should_use_colors, truncate,
    RenderOptions, EXTRA_SEATS_NOTE,
};
