//! Cranelift module setup and function finalization.
//!
//! One [`Backend`] owns one `JITModule` for the lifetime of a compiler. Every
//! top-level expression and every function literal is declared as an
//! anonymous function in it and finalized immediately, so code pointers are
//! available as soon as a compile returns.

use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{AbiParam, Function, InstBuilder, Signature, UserFuncName, Value};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::FunctionBuilder;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{FuncId, Linkage, Module};

use crate::config::Config;
use crate::error::CompileError;

use super::runtime;

fn codegen_error(err: impl ToString) -> CompileError {
    CompileError::Codegen(err.to_string())
}

macro_rules! runtime_helpers {
    ($($field:ident: $arity:literal => $func:path),* $(,)?) => {
        /// Pre-declared runtime helper function IDs
        pub(crate) struct RuntimeHelpers {
            $(pub(crate) $field: FuncId,)*
        }

        fn register_symbols(builder: &mut JITBuilder) {
            $(builder.symbol(concat!("sledge_jit_", stringify!($field)), $func as *const u8);)*
        }

        fn declare_helpers(module: &mut JITModule) -> Result<RuntimeHelpers, CompileError> {
            Ok(RuntimeHelpers {
                $($field: declare_helper(module, concat!("sledge_jit_", stringify!($field)), $arity)?,)*
            })
        }
    };
}

runtime_helpers! {
    box_int: 1 => runtime::sledge_jit_box_int,
    unbox: 1 => runtime::sledge_jit_unbox,
    ensure_int: 1 => runtime::sledge_jit_ensure_int,
    div: 2 => runtime::sledge_jit_div,
    cons: 2 => runtime::sledge_jit_cons,
    car: 1 => runtime::sledge_jit_car,
    car_int: 1 => runtime::sledge_jit_car_int,
    cdr: 1 => runtime::sledge_jit_cdr,
    alloc_bytes: 1 => runtime::sledge_jit_alloc_bytes,
    alloc_str: 1 => runtime::sledge_jit_alloc_str,
    concat: 2 => runtime::sledge_jit_concat,
    get: 2 => runtime::sledge_jit_get,
    put: 3 => runtime::sledge_jit_put,
    size: 1 => runtime::sledge_jit_size,
    write: 2 => runtime::sledge_jit_write,
    print: 1 => runtime::sledge_jit_print,
    eval: 1 => runtime::sledge_jit_eval,
    pixel: 3 => runtime::sledge_jit_pixel,
    rectfill: 5 => runtime::sledge_jit_rectfill,
    flip: 0 => runtime::sledge_jit_flip,
    blit_mono: 6 => runtime::sledge_jit_blit_mono,
    blit_mono_inv: 6 => runtime::sledge_jit_blit_mono_inv,
    inkey: 0 => runtime::sledge_jit_inkey,
    load: 1 => runtime::sledge_jit_load,
    save: 2 => runtime::sledge_jit_save,
    ls: 0 => runtime::sledge_jit_ls,
}

/// Helpers all take `arity` words and return one.
fn declare_helper(module: &mut JITModule, name: &str, arity: usize) -> Result<FuncId, CompileError> {
    let mut sig = module.make_signature();
    sig.params
        .extend(std::iter::repeat(AbiParam::new(I64)).take(arity));
    sig.returns.push(AbiParam::new(I64));
    module
        .declare_function(name, Linkage::Import, &sig)
        .map_err(codegen_error)
}

pub struct Backend {
    module: JITModule,
    helpers: RuntimeHelpers,
}

impl Backend {
    pub fn new(config: &Config) -> Result<Self, CompileError> {
        let mut flag_builder = settings::builder();
        flag_builder
            .set("use_colocated_libcalls", "false")
            .map_err(codegen_error)?;
        flag_builder.set("is_pic", "false").map_err(codegen_error)?;
        flag_builder
            .set("opt_level", config.opt_level.as_flag())
            .map_err(codegen_error)?;

        let isa_builder = cranelift_native::builder().map_err(codegen_error)?;
        let isa = isa_builder
            .finish(settings::Flags::new(flag_builder))
            .map_err(codegen_error)?;

        let mut builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
        register_symbols(&mut builder);

        let mut module = JITModule::new(builder);
        let helpers = declare_helpers(&mut module)?;

        Ok(Backend { module, helpers })
    }

    pub(crate) fn helpers(&self) -> &RuntimeHelpers {
        &self.helpers
    }

    /// Signature shared by every compiled expression and function body:
    /// no parameters, one word back.
    pub fn signature(&self) -> Signature {
        let mut sig = self.module.make_signature();
        sig.returns.push(AbiParam::new(I64));
        sig
    }

    /// Declare a fresh function and return an empty body for it.
    pub(crate) fn new_function(&mut self) -> Result<(FuncId, Function), CompileError> {
        let sig = self.signature();
        let id = self
            .module
            .declare_anonymous_function(&sig)
            .map_err(codegen_error)?;
        let func = Function::with_name_signature(UserFuncName::user(0, id.as_u32()), sig);
        Ok((id, func))
    }

    /// Compile a finished body and return its entry point.
    pub(crate) fn finalize(&mut self, id: FuncId, func: Function) -> Result<*const u8, CompileError> {
        let mut ctx = self.module.make_context();
        ctx.func = func;
        self.module
            .define_function(id, &mut ctx)
            .map_err(codegen_error)?;
        self.module.clear_context(&mut ctx);
        self.module.finalize_definitions().map_err(codegen_error)?;
        Ok(self.module.get_finalized_function(id))
    }

    /// Call a runtime helper and return its result.
    pub(crate) fn call_helper(
        &mut self,
        builder: &mut FunctionBuilder,
        helper: FuncId,
        args: &[Value],
    ) -> Value {
        let func_ref = self.module.declare_func_in_func(helper, builder.func);
        let call = builder.ins().call(func_ref, args);
        builder.inst_results(call)[0]
    }

    /// Call compiled code through a pointer held in `code`.
    pub(crate) fn call_code(&mut self, builder: &mut FunctionBuilder, code: Value) -> Value {
        let sig_ref = builder.import_signature(self.signature());
        let call = builder.ins().call_indirect(sig_ref, code, &[]);
        builder.inst_results(call)[0]
    }
}
