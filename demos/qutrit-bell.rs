use std::time::Instant;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::{ SeedableRng, rngs::StdRng };
use rustc_hash::FxHashMap as HashMap;
use qudit_calc::{
    circuit,
    gate::{ EPSILON, GateKind::*, unitarity_error },
    qudit::Qudit,
    state::{ basis_state, sample_measurement, tensor_product },
};

fn timeit<F, T>(mut f: F) -> (T, f64)
where F: FnMut() -> T
{
    let t0 = Instant::now();
    let out: T = f();
    (out, (Instant::now() - t0).as_secs_f64())
}

fn digits(mut idx: usize, dims: &[usize]) -> Vec<usize> {
    let mut out = vec![0; dims.len()];
    for (k, d) in dims.iter().enumerate().rev() {
        out[k] = idx % d;
        idx /= d;
    }
    out
}

fn index(digits: &[usize], dims: &[usize]) -> usize {
    digits.iter().zip(dims).fold(0, |acc, (x, d)| acc * d + x)
}

// apply `u` to the qudits at positions `targets` of a joint state
fn apply(
    state: &nd::Array1<C64>,
    u: &nd::Array2<C64>,
    targets: &[usize],
    dims: &[usize],
) -> nd::Array1<C64> {
    let sub_dims: Vec<usize> = targets.iter().map(|t| dims[*t]).collect();
    let mut out: nd::Array1<C64> = nd::Array1::zeros(state.len());
    for (idx, amp) in state.iter().enumerate() {
        if amp.norm() == 0.0 { continue; }
        let mut joint = digits(idx, dims);
        let local: Vec<usize> = targets.iter().map(|t| joint[*t]).collect();
        let col = index(&local, &sub_dims);
        for row in 0..u.nrows() {
            let coef = u[[row, col]];
            if coef.norm() == 0.0 { continue; }
            for (t, x) in targets.iter().zip(digits(row, &sub_dims)) {
                joint[*t] = x;
            }
            out[index(&joint, dims)] += coef * amp;
        }
    }
    out
}

// prepare and measure a maximally entangled pair of qutrits
//
// ∣0⟩ --H--*--M
//          |
// ∣0⟩ -----X--M
//
fn main() -> anyhow::Result<()> {
    let (circuit, _, order) =
        circuit!(
            3,
            (H, "a"),
            (CNOT, ["a", "b"]),
            (Measure, "a"),
            (Measure, "b"),
        )?;
    println!("{}", circuit);

    let dims: Vec<usize> = order.iter().map(Qudit::dim).collect();
    let position = |q: &Qudit| order.iter().position(|p| p == q);
    let mut state =
        tensor_product(
            &dims.iter()
                .map(|d| basis_state(*d, 0))
                .collect::<Result<Vec<_>, _>>()?
        )?;
    for op in circuit.iter() {
        let Some(u) = op.gate().unitary() else { continue; };
        anyhow::ensure!(unitarity_error(&u) < EPSILON, "{} is not unitary", op.gate());
        let targets: Vec<usize> =
            op.qudits().iter()
            .filter_map(position)
            .collect();
        state = apply(&state, &u, &targets, &dims);
    }
    println!("state = {:.3}", state);

    let shots = 3000;
    let mut rng = StdRng::seed_from_u64(10546);
    print!("sample {} shots ... ", shots);
    let (counts, t) =
        timeit(|| {
            let mut counts: HashMap<(usize, usize), usize> = HashMap::default();
            for _ in 0..shots {
                let outcome = sample_measurement(&state, &order, &mut rng)?;
                *counts.entry((outcome["a"], outcome["b"])).or_insert(0) += 1;
            }
            Ok::<_, anyhow::Error>(counts)
        });
    println!("{:.3e} secs", t);
    let mut counts: Vec<((usize, usize), usize)> = counts?.into_iter().collect();
    counts.sort();
    for ((a, b), n) in counts {
        println!("  a = {}, b = {}: {}", a, b, n);
    }
    Ok(())
}
