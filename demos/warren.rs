//! Felippa's plane Warren truss, solved in 3D with the z DOFs fixed.
//!
//! Run with `RUST_LOG=trussfem=debug` to follow the pipeline.

use trussfem::{Axis, NodeId, TrussStructure};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::default()
        .parse_env(env_logger::Env::default().filter_or("RUST_LOG", "trussfem=info"))
        .init();

    let mut truss = TrussStructure::new();
    let material = truss.add_material("felippa", 1000.0)?;

    let mut bottom = Vec::new();
    for x in [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0] {
        bottom.push(truss.add_node(x, 0.0, 0.0)?);
    }
    let mut top = Vec::new();
    for (x, y) in [(10.0, 5.0), (20.0, 8.0), (30.0, 9.0), (40.0, 8.0), (50.0, 5.0)] {
        top.push(truss.add_node(x, y, 0.0)?);
    }

    for pair in bottom.windows(2) {
        truss.add_truss_element(pair[0], pair[1], material, 2.0)?;
    }
    let chord: Vec<NodeId> = std::iter::once(bottom[0])
        .chain(top.iter().copied())
        .chain(std::iter::once(bottom[6]))
        .collect();
    for pair in chord.windows(2) {
        truss.add_truss_element(pair[0], pair[1], material, 10.0)?;
    }
    for (i, &node) in top.iter().enumerate() {
        truss.add_truss_element(node, bottom[i + 1], material, 3.0)?;
    }
    for (upper, lower) in [(0, 2), (1, 3), (3, 3), (4, 4)] {
        truss.add_truss_element(top[upper], bottom[lower], material, 1.0)?;
    }

    let fixed: Vec<usize> = truss
        .nodes()
        .iter()
        .map(|node| trussfem::dof_index(node.id().get(), Axis::Z))
        .chain([1, 2, bottom[6].dofs()[1]])
        .collect();
    truss.add_bcs(&fixed)?;
    let loaded: Vec<usize> = bottom[1..6].iter().map(|node| node.dofs()[1]).collect();
    truss.add_forces(&loaded, &[-10.0, -10.0, -16.0, -10.0, -10.0])?;

    let solution = truss.solve()?;

    println!("node        ux        uy");
    for node in truss.nodes() {
        if let Some([ux, uy, _]) = solution.node_displacement(node.id()) {
            println!("{:>4} {ux:>9.4} {uy:>9.4}", node.id().get());
        }
    }
    println!();
    println!("element   stress     force");
    for (element, (stress, force)) in truss
        .elements()
        .iter()
        .zip(solution.stresses.iter().zip(&solution.axial_forces))
    {
        println!("{:>7} {stress:>8.3} {force:>9.3}", element.id().get());
    }

    Ok(())
}
