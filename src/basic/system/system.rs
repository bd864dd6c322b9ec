#![allow(deprecated)]
#[allow(unused_imports)]
use std::{f64::consts::PI, str::FromStr};

use super::{admittance, test_ieee39};
use crate::basic::newtonpf::newton_pf;
#[allow(unused_imports)]
use crate::basic::solver::RSparseSolver;
use crate::io::pandapower::*;
use bevy_ecs::component::Component;
use nalgebra::*;
use nalgebra_sparse::*;
use num_complex::Complex64;
use num_traits::One;

#[cfg(feature = "klu")]
use crate::basic::solver::KLUSolver;

/// Represents the ground node in the network.
pub const GND: i32 = -1;

/// Represents a branch with admittance and port information.
#[derive(Debug, Default, Clone, Component)]
#[cfg_attr(feature = "archive", derive(serde::Serialize, serde::Deserialize))]
pub struct AdmittanceBranch {
    /// The admittance value of the branch.
    pub y: admittance::Admittance,
    /// The port information of the branch.
    pub port: admittance::Port2,
    /// base voltage for per-unit values
    pub v_base: f64,
}

/// Represents a node with specified power and bus information in a power system.
#[derive(Debug, Clone, Copy, Default, Component)]
#[cfg_attr(feature = "archive", derive(serde::Serialize, serde::Deserialize))]
pub struct PQNode {
    /// The complex power injected at the node.
    pub s: Complex<f64>,
    /// The bus identifier of the node.
    pub bus: i64,
}

/// Represents a node with specified active power, voltage, and bus information in a power system.
#[derive(Debug, Clone, Copy, Default, Component)]
#[cfg_attr(feature = "archive", derive(serde::Serialize, serde::Deserialize))]
pub struct PVNode {
    /// The active power injected at the node.
    pub p: f64,
    /// The voltage magnitude at the node.
    pub v: f64,
    /// The bus identifier of the node.
    pub bus: i64,
}

/// Represents an external grid node with voltage, phase, and bus information.
#[derive(Debug, Clone, Copy, Component)]
#[cfg_attr(feature = "archive", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtGridNode {
    /// The voltage magnitude at the external grid node.
    pub v: f64,
    /// The phase angle at the external grid node.
    pub phase: f64,
    /// The bus identifier of the external grid node.
    pub bus: i64,
}

impl Default for ExtGridNode {
    /// Creates a default external grid node with voltage set to 1.0 and other properties set to default.
    fn default() -> Self {
        Self {
            v: 1.0,
            phase: Default::default(),
            bus: Default::default(),
        }
    }
}
#[deprecated(
    since = "0.2.0",
    note = "This struct is deprecated.
     Use `default_app()` to create a bevy App with default plugins or `PowerGrid` instead."
)]
/// Represents a power flow network with base voltage and power, bus, load, PV node, external grid node, and branch information.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "archive", derive(serde::Serialize, serde::Deserialize))]
pub struct PFNetwork {
    /// The base voltage of the network.
    pub v_base: f64,
    /// The base power of the network.
    pub s_base: f64,
    /// The list of buses in the network.
    pub buses: Vec<Bus>,
    /// The list of PQ nodes in the network.
    pub pq_loads: Vec<PQNode>,
    /// The list of PV nodes in the network.
    pub pv_nodes: Vec<PVNode>,
    /// The external grid node in the network.
    pub ext: ExtGridNode,
    /// The list of branches with admittance and port information in the network.
    pub y_br: Vec<AdmittanceBranch>,
}

/// Creates the nodal admittance matrix (Ybus) of the power flow network.
///
/// This function calculates the nodal admittance matrix (Ybus) of the power flow network using the provided parameters.
///
/// # Arguments
///
/// * `pf` - A reference to the power flow network.
/// * `incidence_matrix` - A COO (Coordinate) matrix representing the network's incidence matrix.
/// * `admits` - An array of complex numbers representing the admittance values.
///
/// # Returns
///
/// The nodal admittance matrix (Ybus) of the power flow network as a CSR (Compressed Sparse Row) matrix.
fn create_ybus(
    pf: &PFNetwork,
    incidence_matrix: &CooMatrix<Complex<f64>>,
    admits: &[AdmittanceBranch],
) -> CsrMatrix<Complex<f64>> {
    let mut diag_admit = CsrMatrix::identity(pf.y_br.len());
    let y: Vec<_> = admits.iter().map(|x| x.y.0).collect();
    let base: Vec<_> = admits.iter().map(|x| x.v_base).collect();
    diag_admit.values_mut().clone_from_slice(y.as_slice());
    diag_admit
        .values_mut()
        .iter_mut()
        .zip(base)
        .for_each(|(x, vbase)| (*x) *= (vbase * vbase) / pf.s_base);

    let incidence_matrix = CsrMatrix::from(incidence_matrix);
    let ybus = &incidence_matrix * (diag_admit * incidence_matrix.transpose());

    ybus
}

/// Creates the incidence matrix of the power flow network.
///
/// This function creates the incidence matrix of the power flow network based on the provided number of nodes and admittance branch information.
///
/// # Arguments
///
/// * `nodes` - The number of nodes in the power flow network.
/// * `y_br` - A reference to a vector containing the admittance branch information.
///
/// # Returns
///
/// The incidence matrix of the power flow network as a COO (Coordinate) matrix.
fn create_incidence_mat(nodes: usize, y_br: &Vec<AdmittanceBranch>) -> CooMatrix<Complex<f64>> {
    let mut incidence_matrix = CooMatrix::new(nodes, y_br.len());
    for (idx, i) in y_br.iter().enumerate() {
        if i.port.0[0] >= 0 {
            incidence_matrix.push(i.port.0[0] as usize, idx as usize, Complex::one());
        }
        if i.port.0[1] >= 0 {
            incidence_matrix.push(i.port.0[1] as usize, idx as usize, -Complex::one());
        }
    }
    incidence_matrix
}

/// Creates the permutation matrix for reordering buses in the power flow network.
///
/// This function creates the permutation matrix for reordering buses in the power flow network based on PV nodes, PQ nodes, and external grid nodes.
///
/// # Arguments
///
/// * `pv` - A reference to a vector containing PV node indices.
/// * `pq` - A reference to a vector containing PQ node indices.
/// * `ext` - A reference to a vector containing external grid node indices.
/// * `nodes` - The total number of nodes in the power flow network.
///
/// # Returns
///
/// The permutation matrix for reordering buses in the power flow network as a COO (Coordinate) matrix.
fn create_premute_mat(
    pv: &Vec<i64>,
    pq: &Vec<i64>,
    ext: &Vec<i64>,
    nodes: usize,
) -> CooMatrix<i32> {
    let row_indices = DVector::from_fn(nodes, |i, _| i);
    let mut col_indices = DVector::from_fn(nodes, |i, _| i);
    let values = DVector::from_element(nodes, 1);

    let n_bus = pv.len() + pq.len();
    for i in 0..pv.len() {
        //let temp = col_indices[i];
        col_indices[i] = pv[i] as usize;
        //col_indices[pv[i] as usize] = temp;
    }
    for i in pv.len()..n_bus {
        //let temp = col_indices[i];
        col_indices[i] = pq[i - pv.len()] as usize;
        //col_indices[pv[i] as usize] = temp;
    }
    for i in n_bus..nodes {
        col_indices[i] = ext[i - n_bus] as usize;
    }
    let t = unsafe {
        CooMatrix::try_from_triplets(
            nodes,
            nodes,
            row_indices.data.into(),
            col_indices.data.into(),
            values.data.into(),
        )
        .unwrap_unchecked()
    };
    t
}

/// A trait for running power flow analysis.
pub trait RunPF {
    /// Creates the nodal admittance matrix (Ybus) of the power flow network.
    fn create_y_bus(&self) -> CsrMatrix<Complex64>;

    /// Creates the nodal power injection vector (Sbus) of the power flow network.
    fn create_s_bus(&self) -> DVector<Complex64>;

    /// Creates the initial voltage vector (V_init) of the power flow network.
    fn create_v_init(&self) -> DVector<Complex64>;

    /// Runs the power flow analysis.
    ///
    /// # Arguments
    ///
    /// * `v_init` - The initial voltage vector.
    /// * `max_it` - The maximum number of iterations (optional).
    /// * `tol` - The convergence tolerance (optional).
    ///
    /// # Returns
    ///
    /// The converged voltage vector and iterations.
    fn run_pf(
        &self,
        v_init: DVector<Complex64>,
        max_it: Option<usize>,
        tol: Option<f64>,
    ) -> (DVector<Complex64>, usize);
}

impl RunPF for PFNetwork {
    fn create_y_bus(&self) -> CsrMatrix<Complex64> {
        let nodes = self.buses.len();
        let incidence_matrix = create_incidence_mat(nodes, &self.y_br);
        let ybus = create_ybus(self, &incidence_matrix, self.y_br.as_slice());

        ybus
    }

    fn create_s_bus(&self) -> DVector<Complex64> {
        let nodes = self.buses.len();
        let mut sbus = DVector::zeros(nodes);
        for i in &self.pq_loads {
            sbus[i.bus as usize] -= i.s;
        }
        for i in &self.pv_nodes {
            sbus[i.bus as usize] += i.p;
        }

        let divider = 1.0 / self.s_base;
        sbus.apply(|x| (*x) *= divider);

        sbus
    }

    fn create_v_init(&self) -> DVector<Complex64> {
        let nodes = self.buses.len();
        let mut vbus = DVector::from_element(nodes, Complex64::one());
        for i in &self.pv_nodes {
            vbus[i.bus as usize] = Complex64::new(i.v, 0.0);
        }
        vbus[self.ext.bus as usize] = Complex64::from_polar(self.ext.v, self.ext.phase);

        vbus
    }
    #[allow(non_snake_case)]
    fn run_pf(
        &self,
        v_init: DVector<Complex64>,
        max_it: Option<usize>,
        tol: Option<f64>,
    ) -> (DVector<Complex64>, usize) {
        let (reorder, Ybus, Sbus, v_init, npv, npq) = self.prepare_matrices(v_init);

        #[cfg(feature = "klu")]
        let mut solver = KLUSolver::default();
        #[cfg(not(feature = "klu"))]
        let mut solver = RSparseSolver {};
        let v = newton_pf(&Ybus, &Sbus, &v_init, npv, npq, tol, max_it, &mut solver);
        let (v, iter) = v.unwrap();
        let x = reorder.transpose() * &v;

        (x, iter)
    }
}

impl PFNetwork {
    /// Prepares matrices for power flow analysis.
    #[allow(non_snake_case)]
    pub fn prepare_matrices(
        &self,
        v_init: Matrix<Complex<f64>, Dyn, Const<1>, VecStorage<Complex<f64>, Dyn, Const<1>>>,
    ) -> (
        CsrMatrix<Complex<f64>>,
        CscMatrix<Complex<f64>>,
        Matrix<Complex<f64>, Dyn, Const<1>, VecStorage<Complex<f64>, Dyn, Const<1>>>,
        Matrix<Complex<f64>, Dyn, Const<1>, VecStorage<Complex<f64>, Dyn, Const<1>>>,
        usize,
        usize,
    ) {
        let Sbus = self.create_s_bus();
        let Ybus = self.create_y_bus();
        let pv: Vec<_> = self.pv_nodes.iter().map(|x| x.bus).collect();
        let ext: Vec<_> = vec![self.ext.bus];
        let pq: Vec<_> = self
            .buses
            .iter()
            .flat_map(|x| {
                if pv.contains(&x.index) || ext.contains(&x.index) {
                    None
                } else {
                    Some(x.index)
                }
            })
            .collect();

        let reorder = create_premute_mat(&pv, &pq, &ext, self.buses.len());
        let from = CsrMatrix::from(&reorder);
        let reorder: CsrMatrix<Complex64> = CsrMatrix::try_from_pattern_and_values(
            from.pattern().clone(),
            Vec::from_iter(from.values().iter().map(|x| Complex64::new(*x as f64, 0.0))),
        )
        .unwrap();
        // Transform Ybus and Sbus according to the permutation
        let Ybus: CscMatrix<_> = (&reorder * Ybus * &reorder.transpose()).transpose_as_csc();

        let Sbus = &reorder * Sbus;
        let v_init = &reorder * v_init;
        let npv = pv.len();
        let npq = pq.len();
        (reorder, Ybus, Sbus, v_init, npv, npq)
    }
}

pub fn test_system() -> (PFNetwork, Vec<i64>, usize, Vec<Complex<f64>>) {
    let file_path = test_ieee39::IEEE_39;
    let net: Network = serde_json::from_str(file_path).unwrap();
    let pf = PFNetwork::from(net);
    let pv: Vec<_> = pf.pv_nodes.iter().map(|x| x.bus).collect();
    let nodes = pf.buses.len();
    let admits: Vec<_> = pf.y_br.iter().map(|x| x.y.0).collect();
    (pf, pv, nodes, admits)
}
