//! Fixed parts of a new presentation.
//!
//! One master, one "Title and Content" layout and one theme are enough for
//! PowerPoint and LibreOffice to open the deck and edit it further.

/// Slide master with title and body placeholders.
pub fn slide_master_xml() -> &'static str {
    include_str!("../../resources/slideMaster1.xml")
}

/// "Title and Content" layout.
pub fn slide_layout_xml() -> &'static str {
    include_str!("../../resources/slideLayout1.xml")
}

/// Office theme with the default color, font and format schemes.
pub fn theme_xml() -> &'static str {
    include_str!("../../resources/theme1.xml")
}

pub fn pres_props_xml() -> &'static str {
    include_str!("../../resources/presProps.xml")
}

pub fn view_props_xml() -> &'static str {
    include_str!("../../resources/viewProps.xml")
}

pub fn table_styles_xml() -> &'static str {
    include_str!("../../resources/tableStyles.xml")
}
