//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example load_obj -- path/to/model.obj

use std::env;

use wobj_core::load_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_obj <path-to-obj-file>");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(model) => {
            println!("\n=== {} ===", path);
            println!("Sub-objects: {}", model.sub_objects.len());
            println!("Material libraries: {:?}", model.material_libraries);

            for (i, sub) in model.sub_objects.iter().enumerate() {
                println!(
                    "\n[{}] '{}' - {} positions, {} normals, {} texcoords, {} triangles",
                    i,
                    sub.name,
                    sub.positions.len(),
                    sub.normals.len(),
                    sub.texcoords.len(),
                    sub.triangle_count()
                );
                if !sub.material.is_empty() {
                    println!("     material: {}", sub.material);
                }

                match sub.extract_mesh() {
                    Ok(mesh) => println!(
                        "     extracted: {} unique vertices, {} indices",
                        mesh.vertex_count(),
                        mesh.indices.len()
                    ),
                    Err(e) => eprintln!("     extraction failed: {}", e),
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading OBJ file: {}", e);
        }
    }
}
