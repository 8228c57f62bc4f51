use log::info;

/// Observer for the genetic search loop
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, population_size: usize);
}

/// Logs each generation through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, population_size: usize) {
        info!(
            "Generation {} complete. Best fitness: {:.4}, population: {}",
            generation + 1,
            best_fitness,
            population_size
        );
    }
}

/// Silent callback used when a strategy runs inside the registry or harness
pub struct NoopProgressCallback;

impl ProgressCallback for NoopProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _population_size: usize) {}
}

/// Collects the best fitness of every generation
#[derive(Debug, Default, Clone)]
pub struct GenerationRecorder {
    pub best_fitness: Vec<f64>,
    pub started: usize,
}

impl GenerationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.best_fitness.windows(2).all(|w| w[1] >= w[0])
    }
}

impl ProgressCallback for GenerationRecorder {
    fn on_generation_start(&mut self, _generation: usize) {
        self.started += 1;
    }

    fn on_generation_complete(&mut self, _generation: usize, best_fitness: f64, _population_size: usize) {
        self.best_fitness.push(best_fitness);
    }
}
