//! Print the buffered-ASU images of a few sites in a monoclinic P2₁ cell.
//!
//! Usage:
//!   cargo run -p dsasu --example p21_mappings -- [buffer_thickness]

use dsasu::asu::half_cell_x;
use dsasu::prelude::*;

fn main() -> Result<(), AsuError> {
    let buffer: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1.5);
    let cell = UnitCell::new([8.2, 6.1, 9.4, 90.0, 103.5, 90.0])?;
    let group = SpaceGroup::from_xyz(&["x,y,z", "-x,y+1/2,-z"])?;
    let mut am = AsuMappings::with_default_epsilon(group, half_cell_x(cell)?, buffer)?;
    let sites = [
        Vector3::new(0.1, 0.2, 0.3),
        Vector3::new(0.0, 0.25, 0.0),
        Vector3::new(0.49, 0.9, 0.02),
    ];
    am.process_sites(&sites);
    for (i_seq, site) in sites.iter().enumerate() {
        println!("site {i_seq} {:?}", site.as_slice());
        for i_sym in 0..am.mappings()[i_seq].len() {
            let m = &am.mappings()[i_seq][i_sym];
            let op = am.rt_mx(i_seq, i_sym).unwrap_or_else(SymOp::identity);
            println!(
                "  op {} shifts {:?} -> {:?}  ({op})",
                m.i_sym_op(),
                m.unit_shifts().as_slice(),
                m.mapped_site().as_slice()
            );
        }
    }
    Ok(())
}
