use super::kernel::Kernel;

/// 多個 kernel 在同一點求值後相加；分散式 worker 實際求值的就是這個。
pub struct CompositeKernel {
    kernels: Vec<Box<dyn Kernel>>
}

impl CompositeKernel {
    pub fn new(kernels: Vec<Box<dyn Kernel>>) -> CompositeKernel {
        CompositeKernel { kernels }
    }
}

impl Kernel for CompositeKernel {
    fn value(&self, x: f64) -> f64 {
        self.kernels.iter().map(|kernel| kernel.value(x)).sum()
    }

    fn invalidate(&self) {
        for kernel in &self.kernels {
            kernel.invalidate();
        }
    }
}
