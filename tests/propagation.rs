use minicolumns::core::column::{MiniColumn, SpikeSource};
use minicolumns::core::factory::{Factory, LayerFactory, SimpleMiniColumnFactory};
use minicolumns::core::layer::{Connection, LayerInputs, Sensor};
use minicolumns::core::unit::{ComputationUnit, ThresholdNeuron};
use minicolumns::{NetworkError, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;

fn count_spikes(column: &MiniColumn) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    column.spike().subscribe(move |_: &f32| -> Result<()> {
        counter.set(counter.get() + 1);
        Ok(())
    });
    count
}

#[test]
fn unconnected_column_stays_silent() {
    let units: Vec<Box<dyn ComputationUnit>> = vec![
        Box::new(ThresholdNeuron::new(3, 0.5, 0.5)),
        Box::new(ThresholdNeuron::new(3, 0.5, 0.5)),
    ];
    let mut column = MiniColumn::new("lonely", units).unwrap();
    let spikes = count_spikes(&column);

    column.process().unwrap();

    assert_eq!(column.outputs(), &[0.0, 0.0]);
    assert!(!column.active());
    assert_eq!(spikes.get(), 0);
}

#[test]
fn spike_lands_in_the_assigned_slot_only() {
    let mut factory = SimpleMiniColumnFactory::simple(1, 1);
    let sources: Vec<MiniColumn> = (0..5).map(|_| factory.create().unwrap()).collect();
    let pool: Vec<&MiniColumn> = sources.iter().collect();

    let mut target = SimpleMiniColumnFactory::simple(2, 3).create().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let assignment = target.connect(&pool, &mut rng).unwrap();

    assert_eq!(assignment.len(), 3);
    let subscriptions: Vec<usize> = sources
        .iter()
        .map(|source| source.spike().subscriber_count())
        .collect();
    assert_eq!(subscriptions.iter().sum::<usize>(), 3);
    assert!(subscriptions.iter().all(|&count| count <= 1));

    sources[2].spike().fire(&1.0).unwrap();

    let expected: Vec<f32> = assignment
        .iter()
        .map(|&source| if source == 2 { 1.0 } else { 0.0 })
        .collect();
    assert_eq!(target.inputs().values(), expected.as_slice());
}

#[test]
fn input_connection_copies_layer_outputs() {
    let mut rng = StdRng::seed_from_u64(5);
    let dummy_output: Vec<f32> = (0..10)
        .map(|_| if rng.random::<f32>() < 0.5 { 1.0 } else { 0.0 })
        .collect();
    let computation = {
        let output = dummy_output.clone();
        move |_: &LayerInputs<'_>, outputs: &mut [f32]| outputs.copy_from_slice(&output)
    };
    let mut factory = LayerFactory::new(10, computation);
    let mut first = factory.create();
    let second = factory.create();
    Connection::input(&first, &second).unwrap();

    first.compute().unwrap();

    assert_eq!(second.inputs().values(), dummy_output.as_slice());
    assert!(second.feedback().is_empty());
    assert!(second.inhibitions().is_empty());
}

#[test]
fn feedback_and_inhibition_have_their_own_buffers() {
    let output = vec![1.0, 0.0, 1.0, 1.0];
    let computation = {
        let output = output.clone();
        move |_: &LayerInputs<'_>, outputs: &mut [f32]| outputs.copy_from_slice(&output)
    };
    let mut factory = LayerFactory::new(4, computation);
    let mut source = factory.create();
    let destination = factory.create();
    let sensor = Sensor::new(4);

    Connection::input(&sensor, &destination).unwrap();
    Connection::feedback(&source, &destination).unwrap();
    Connection::inhibition(&source, &destination).unwrap();

    sensor.emit(&[0.2, 0.4, 0.6, 0.8]).unwrap();
    source.compute().unwrap();

    assert_eq!(destination.inputs().values(), &[0.2, 0.4, 0.6, 0.8]);
    assert_eq!(destination.feedback().values(), output.as_slice());
    assert_eq!(destination.inhibitions().values(), output.as_slice());
}

#[test]
fn spikes_drive_downstream_on_the_next_process() {
    let mut factory = SimpleMiniColumnFactory::with_thresholds(1, 2, 0.4, 0.5);
    let mut upstream: Vec<MiniColumn> = (0..2).map(|_| factory.create().unwrap()).collect();
    let mut target = factory.create().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    {
        let pool: Vec<&MiniColumn> = upstream.iter().collect();
        target.connect(&pool, &mut rng).unwrap();
    }
    let spikes = count_spikes(&target);

    target.process().unwrap();
    assert!(!target.active());

    upstream[0].set_active(true).unwrap();
    target.process().unwrap();
    assert!(target.active());
    assert_eq!(spikes.get(), 1);

    target.process().unwrap();
    assert_eq!(spikes.get(), 1);

    upstream[0].set_active(false).unwrap();
    target.process().unwrap();
    assert!(!target.active());
    assert_eq!(spikes.get(), 2);
}

#[test]
fn dropped_target_surfaces_on_fire() {
    let mut factory = SimpleMiniColumnFactory::simple(1, 1);
    let mut source = factory.create().unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    {
        let mut target = factory.create().unwrap();
        target.connect(&[&source], &mut rng).unwrap();
    }

    assert_eq!(source.set_active(true), Err(NetworkError::DetachedTarget));
    assert!(source.active());
}

/// Outputs `1.0` whatever the input.
struct AlwaysOn;

impl ComputationUnit for AlwaysOn {
    fn num_synapses(&self) -> usize {
        1
    }

    fn compute(&self, _inputs: &[f32]) -> f32 {
        1.0
    }
}

#[test]
fn process_reports_errors_from_downstream_writes() {
    let units: Vec<Box<dyn ComputationUnit>> = vec![Box::new(AlwaysOn)];
    let mut source = MiniColumn::new("source", units).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    {
        let mut target = SimpleMiniColumnFactory::simple(1, 1).create().unwrap();
        target.connect(&[&source], &mut rng).unwrap();
    }

    assert_eq!(source.process(), Err(NetworkError::DetachedTarget));
    assert!(source.active());
    assert_eq!(source.outputs(), &[1.0]);
}
