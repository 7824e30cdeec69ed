//! Markup of the audio control inserted into a slide.

use super::options::IconPlacement;
use quick_xml::escape::escape;
use uuid::Uuid;

const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";
const NS_A16: &str = "http://schemas.microsoft.com/office/drawing/2014/main";

/// Extension carrying `a16:creationId`.
const CREATION_ID_EXT: &str = "{FF2B5EF4-FFF2-40B4-BE49-F238E27FC236}";
/// Extension carrying `p14:media`.
const MEDIA_EXT: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";

/// Relationship ids the control points at.
#[derive(Debug, Clone)]
pub struct AudioControlRefs<'a> {
    /// `a:audioFile/@r:link`
    pub audio: &'a str,
    /// `p14:media/@r:embed`
    pub media: &'a str,
    /// `a:blip/@r:embed`
    pub icon: &'a str,
}

/// Braced upper-case v4 UUID, as PowerPoint writes creation ids.
pub fn new_creation_id() -> String {
    format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase())
}

/// Build the `p:pic` element for a click-to-play audio control.
///
/// The element declares the namespaces it uses so it stays valid whatever
/// prefixes the host slide binds.
pub fn audio_picture(
    shape_id: u32,
    name: &str,
    refs: &AudioControlRefs<'_>,
    placement: &IconPlacement,
    creation_id: &str,
) -> String {
    let mut xml = String::with_capacity(1536);

    xml.push_str(&format!(
        r#"<p:pic xmlns:p="{}" xmlns:a="{}" xmlns:r="{}">"#,
        NS_P, NS_A, NS_R
    ));

    xml.push_str("<p:nvPicPr>");
    xml.push_str(&format!(
        r#"<p:cNvPr id="{}" name="{}">"#,
        shape_id,
        escape(name)
    ));
    xml.push_str(r#"<a:hlinkClick r:id="" action="ppaction://media"/>"#);
    xml.push_str(&format!(
        r#"<a:extLst><a:ext uri="{}"><a16:creationId xmlns:a16="{}" id="{}"/></a:ext></a:extLst>"#,
        CREATION_ID_EXT, NS_A16, creation_id
    ));
    xml.push_str("</p:cNvPr>");
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);

    xml.push_str("<p:nvPr>");
    xml.push_str(&format!(r#"<a:audioFile r:link="{}"/>"#, refs.audio));
    xml.push_str(&format!(
        r#"<p:extLst><p:ext uri="{}"><p14:media xmlns:p14="{}" r:embed="{}"/></p:ext></p:extLst>"#,
        MEDIA_EXT, NS_P14, refs.media
    ));
    xml.push_str("</p:nvPr>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    xml.push_str(&format!(r#"<a:blip r:embed="{}"/>"#, refs.icon));
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str(&format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        placement.x, placement.y, placement.cx, placement.cy
    ));
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("</p:pic>");
    xml
}
