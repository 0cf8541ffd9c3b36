use trussfem::TrussStructure;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut truss = TrussStructure::new();
    let steel = truss.add_material("steel", 200.0e9)?;
    let a = truss.add_node(0.0, 0.0, 0.0)?;
    let b = truss.add_node(1.0, 0.0, 0.0)?;
    truss.add_truss_element(a, b, steel, 0.01)?;
    truss.add_bcs(&a.dofs())?;
    truss.add_bcs(&b.dofs()[1..])?;
    truss.add_forces(&b.dofs()[..1], &[-1000.0])?;

    let solution = truss.solve()?;

    if let Some([ux, _, _]) = solution.node_displacement(b) {
        println!("ux = {ux:.3e} m");
    }
    println!("stress = {:.3e} Pa", solution.stresses[0]);

    Ok(())
}
