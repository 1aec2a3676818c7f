pub mod configuration;
pub mod integralerror;
pub mod benchmark;

pub mod math {
    pub mod partition;
    pub mod special;

    pub mod quadrature {
        pub mod trapezoid;
    }
}

pub mod kernel {
    pub mod kernel;
    pub mod seriesexpansion;
    pub mod arcsine;
    pub mod exponential;
    pub mod heavisidestep;
    pub mod coefficientbackend;
    pub mod serieskernel;
    pub mod compositekernel;
}

pub mod protocol {
    pub mod protocolerror;
    pub mod bytecursor;
    pub mod jobmessage;
    pub mod messaging;
}

pub mod transport {
    pub mod communicator;
    pub mod transporterror;
    pub mod localcluster;
}

pub mod executor {
    pub mod domainsplit;
    pub mod integrationresult;
    pub mod integrator;
    pub mod coordinator;
    pub mod worker;
    pub mod sharedmemory;
    pub mod participant;
}
