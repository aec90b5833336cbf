use thalflow::{
    is_tainted, ContractId, DependencyEmitter, EmitterConfig, EnvVar, ProgramBuilder, Type, Value,
};

fn main() -> anyhow::Result<()> {
    let mut builder = ProgramBuilder::new();
    let mut token = builder.contract("Token");
    let owner = token.state_variable("owner", Type::Address);
    let fee = token.state_variable("fee", Type::Uint(256));

    let mut ctor = token.constructor();
    ctor.entry_block()
        .assign(owner.with_version(1), Value::env(EnvVar::MsgSender));
    ctor.build()?;

    let mut set_fee = token.function("setFee");
    let amount = set_fee.param("amount", Type::Uint(256));
    set_fee
        .entry_block()
        .assign(fee.with_version(1), amount.with_version(0));
    set_fee.build()?;

    let program = builder.build()?;

    println!(
        "fee tainted by unprotected callers: {}",
        is_tainted(&program, &fee, ContractId(0), true, true)
    );
    println!(
        "owner tainted by unprotected callers: {}",
        is_tainted(&program, &owner, ContractId(0), true, true)
    );
    println!();
    print!(
        "{}",
        DependencyEmitter::new(EmitterConfig::default()).report(&program, ContractId(0))?
    );
    Ok(())
}
