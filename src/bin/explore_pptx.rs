//! Utility to inspect the parts an audio embed touches, for development
use slidekit::container::OoxmlContainer;
use slidekit::package::{
    rel_types, slide_part, slide_rels_part, ContentTypes, Relationships, SlideDocument,
};

fn main() {
    let path = std::env::args().nth(1).unwrap_or("deck.pptx".to_string());
    let slide: u32 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let container = OoxmlContainer::open(&path).expect("Failed to open file");

    println!("=== Files in archive ===");
    for file in container.list_files() {
        println!("  {}", file);
    }

    println!("\n=== Default content types ===");
    if let Ok(xml) = container.read_xml("[Content_Types].xml") {
        let types = ContentTypes::parse(&xml).expect("Failed to parse content types");
        for d in types.defaults() {
            println!("  {:<8} {}", d.extension, d.content_type);
        }
    }

    let part = slide_part(slide);
    let rels_part = slide_rels_part(slide);
    println!("\n=== {} ===", rels_part);
    if let Ok(xml) = container.read_xml(&rels_part) {
        match Relationships::parse(&xml) {
            Ok(rels) => {
                for rel in rels.iter() {
                    let kind = rel.rel_type.rsplit('/').next().unwrap_or_default();
                    let resolved = OoxmlContainer::resolve_path(&part, &rel.target);
                    let status = if rel.external || container.exists(&resolved) {
                        ""
                    } else {
                        " (missing)"
                    };
                    println!("  {:<6} {:<14} {}{}", rel.id, kind, rel.target, status);
                }
                println!("  audio links: {}", rels.get_by_type(rel_types::AUDIO).len());
                match rels.next_id() {
                    Ok(id) => println!("  next id: {}", id),
                    Err(e) => println!("  next id: {}", e),
                }
            }
            Err(e) => println!("  unparsable: {}", e),
        }
    }

    println!("\n=== {} ===", part);
    if let Ok(xml) = container.read_xml(&part) {
        let audio_nodes = xml.matches("<a:audioFile").count();
        match SlideDocument::parse(&part, xml) {
            Ok(doc) => {
                println!("  max shape id: {:?}", doc.max_shape_id());
                match doc.next_shape_id() {
                    Ok(id) => println!("  next shape id: {}", id),
                    Err(e) => println!("  next shape id: {}", e),
                }
                println!("  audio controls: {}", audio_nodes);
            }
            Err(e) => println!("  unparsable: {}", e),
        }
    }
}
